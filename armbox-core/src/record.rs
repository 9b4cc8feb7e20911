//! Types and traits for recording training metrics.
//!
//! [`Record`] is a container of key-value pairs produced during training and
//! evaluation. A [`Recorder`] writes records to an output destination, for
//! example TFRecord event files.
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
