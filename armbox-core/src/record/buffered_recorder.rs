use super::{Record, Recorder};

/// Buffered recorder.
///
/// Keeps records in memory, which is useful for inspecting training runs
/// in tests.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<(usize, Record)>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Returns an iterator over the recorded steps and records.
    pub fn iter(&self) -> std::slice::Iter<'_, (usize, Record)> {
        self.buf.iter()
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, step: usize, record: Record) {
        self.buf.push((step, record));
    }
}
