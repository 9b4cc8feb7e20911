//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum ArmboxError {
    /// The requested trajectory would not retain a single step after the
    /// warm-up prefix is dropped.
    #[error(
        "trajectory duration ({duration_secs} s) must be longer than the warm-up ({warmup_secs} s)"
    )]
    TrajectoryTooShort {
        /// Requested trajectory duration in seconds.
        duration_secs: f64,
        /// Warm-up duration in seconds.
        warmup_secs: f64,
    },

    /// A site name unknown to the simulator backend.
    #[error("unknown site: {0}")]
    UnknownSite(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
