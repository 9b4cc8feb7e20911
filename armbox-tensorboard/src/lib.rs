//! TFRecord output for training records.
use armbox_core::record::{Record, RecordValue, Recorder};
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Write records to TFRecord.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    ignore_unsupported_value: bool,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            ignore_unsupported_value: true,
        }
    }

    /// Construct a [`TensorboardRecorder`] that panics on unsupported record
    /// values instead of skipping them.
    pub fn new_with_check_unsupported_value<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            ignore_unsupported_value: false,
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [`Record`] into a TFRecord.
    ///
    /// This method handles [`RecordValue::Scalar`] and
    /// [`RecordValue::DateTime`] in the [`Record`]. Other variants are
    /// skipped unless the recorder was built with
    /// [`TensorboardRecorder::new_with_check_unsupported_value`].
    fn write(&mut self, step: usize, record: Record) {
        for (k, v) in record.iter() {
            match v {
                RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
                RecordValue::DateTime(_) => {} // discard value
                _ => {
                    if !self.ignore_unsupported_value {
                        panic!("Unsupported value: {:?}", (k, v));
                    }
                }
            };
        }
    }

    fn flush(&mut self) {
        self.writer.flush();
    }
}
