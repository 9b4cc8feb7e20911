//! Base implementation of records for logging.
use crate::error::ArmboxError;
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// A single floating-point value, typically used for metrics.
    Scalar(f32),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A 1-dimensional array of floating-point values.
    Array1(Vec<f32>),

    /// A text value.
    String(String),
}

/// A container for storing key-value pairs of various data types.
#[derive(Debug, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<'_, String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records, consuming both.
    ///
    /// If both records contain the same key, the value from the second record
    /// overwrites the value from the first record.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one in place.
    pub fn merge_inplace(&mut self, record: Record) {
        for (k, v) in record.iter() {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, ArmboxError> {
        if let Some(v) = self.0.get(k) {
            match v {
                RecordValue::Scalar(v) => Ok(*v),
                _ => Err(ArmboxError::RecordValueTypeError("Scalar".to_string())),
            }
        } else {
            Err(ArmboxError::RecordKeyError(k.to_string()))
        }
    }

    /// Gets a 1-dimensional array from the record.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, ArmboxError> {
        if let Some(v) = self.0.get(k) {
            match v {
                RecordValue::Array1(v) => Ok(v.clone()),
                _ => Err(ArmboxError::RecordValueTypeError("Array1".to_string())),
            }
        } else {
            Err(ArmboxError::RecordKeyError(k.to_string()))
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, ArmboxError> {
        if let Some(v) = self.0.get(k) {
            match v {
                RecordValue::String(s) => Ok(s.clone()),
                _ => Err(ArmboxError::RecordValueTypeError("String".to_string())),
            }
        } else {
            Err(ArmboxError::RecordKeyError(k.to_string()))
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
