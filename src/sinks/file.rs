//! File sink implementation

use crate::core::{LoggerError, Result, Sink};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Appends records to a file.
///
/// The file is opened in append mode and written through `&File` without a
/// lock, so each record is a single `write` at the end of the file. No
/// buffering: a record is on its way to the OS once `write_record` returns.
#[derive(Debug)]
pub struct FileSink {
    file: File,
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(format!("opening log file '{}'", path.display()), e)
            })?;

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        (&self.file).write_all(record)
    }

    fn flush(&self) -> io::Result<()> {
        (&self.file).flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_file_sink_appends() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("app.log");

        let sink = FileSink::new(&log_path)?;
        sink.write_record(b"{\"n\":1}\n")?;
        sink.write_record(b"{\"n\":2}\n")?;
        sink.flush()?;
        assert_eq!(sink.path(), log_path.as_path());

        // Reopening keeps existing content.
        let sink = FileSink::new(&log_path)?;
        sink.write_record(b"{\"n\":3}\n")?;

        let content = fs::read_to_string(&log_path)?;
        assert_eq!(content, "{\"n\":1}\n{\"n\":2}\n{\"n\":3}\n");
        Ok(())
    }

    #[test]
    fn test_file_sink_open_failure() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("missing").join("app.log");

        let err = FileSink::new(&bad).unwrap_err();
        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
    }
}
