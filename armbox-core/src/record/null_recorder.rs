use super::{Record, Recorder};

/// A recorder that ignores any record.
pub struct NullRecorder {}

impl Recorder for NullRecorder {
    /// Discard the given record.
    fn write(&mut self, _step: usize, _record: Record) {}
}
