//! In-process sinks: capture to memory, or discard

use crate::core::Sink;
use parking_lot::Mutex;
use std::io;

/// Collects records in memory. Handy for tests and for embedding the logger
/// where output is shipped elsewhere in batches.
#[derive(Debug, Default)]
pub struct MemorySink {
    buf: Mutex<Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().clone()
    }

    /// Everything written so far, decoded lossily.
    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// One entry per record, without the trailing newline.
    pub fn lines(&self) -> Vec<String> {
        self.contents_string().lines().map(str::to_owned).collect()
    }

    pub fn len(&self) -> usize {
        self.buf.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.lock().is_empty()
    }

    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        self.buf.lock().extend_from_slice(record);
        Ok(())
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl Sink for NullSink {
    fn write_record(&self, _record: &[u8]) -> io::Result<()> {
        Ok(())
    }
}
