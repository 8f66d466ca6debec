//! Standard stream sinks

use crate::core::Sink;
use std::io::{self, Write};

/// Writes records to the process's standard error.
///
/// Each record is written with a single `write_all` under the std handle's
/// own lock, so records from different threads do not interleave.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(record)
    }

    fn flush(&self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Writes records to the process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(record)
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().flush()
    }
}
