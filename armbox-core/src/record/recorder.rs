use super::Record;

/// Writes records to an output destination.
pub trait Recorder {
    /// Write a record at the given optimization step.
    fn write(&mut self, step: usize, record: Record);

    /// Flushes buffered records, if any.
    fn flush(&mut self) {}
}
