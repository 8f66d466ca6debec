//! Sink implementations

pub mod console;
pub mod file;
pub mod memory;
pub mod sync_writer;

pub use console::{StderrSink, StdoutSink};
pub use file::FileSink;
pub use memory::{MemorySink, NullSink};
pub use sync_writer::SyncWriter;

pub use crate::core::Sink;
