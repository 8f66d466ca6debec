//! Sink trait for log output destinations

use std::io;

/// Destination for finished records.
///
/// `write_record` receives one complete record (a JSON object followed by a
/// newline) per call and may be called from many threads at once. The logger
/// adds no locking of its own: a sink that cannot take concurrent whole-record
/// writes should be wrapped in [`SyncWriter`](crate::sinks::SyncWriter).
pub trait Sink: Send + Sync {
    fn write_record(&self, record: &[u8]) -> io::Result<()>;

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for std::sync::Arc<S> {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        (**self).write_record(record)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}
