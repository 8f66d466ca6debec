//! Mutex-serializing adapter for arbitrary writers

use crate::core::Sink;
use parking_lot::Mutex;
use std::io::{self, Write};

/// Wraps any `Write` so concurrent records are written one at a time.
///
/// Use this for writers that are not safe to share (a `BufWriter`, a socket
/// wrapper, a `Vec<u8>`). It is the only place a lock is taken on the write
/// path, and only when the caller opts into it.
///
/// # Example
///
/// ```
/// use rust_json_logger::{Field, Logger, LogLevel};
/// use rust_json_logger::sinks::SyncWriter;
/// use std::io::BufWriter;
///
/// let out = SyncWriter::new(BufWriter::new(std::io::stdout()));
/// let logger = Logger::builder().level(LogLevel::Info).sink(out).build();
/// logger.info("ready", &[Field::int("port", 8080)]);
/// ```
#[derive(Debug)]
pub struct SyncWriter<W: Write + Send> {
    inner: Mutex<W>,
}

impl<W: Write + Send> SyncWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Run `f` with exclusive access to the wrapped writer.
    pub fn with_inner<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: Write + Send> Sink for SyncWriter<W> {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        self.inner.lock().write_all(record)
    }

    fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}
