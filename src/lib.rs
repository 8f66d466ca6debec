//! # Rust JSON Logger
//!
//! A structured logger that writes one JSON object per line and does not
//! allocate on the hot path.
//!
//! ## Features
//!
//! - **Zero allocation**: records are encoded into pooled buffers
//! - **Cheap filtering**: disabled levels cost one atomic load
//! - **Pre-encoded context**: fields attached with [`Logger::with`] are
//!   encoded once, not per record
//! - **Pluggable output**: any [`Sink`], with console, file and memory sinks
//!   included
//!
//! ## Example
//!
//! ```
//! use rust_json_logger::prelude::*;
//! use std::time::Duration;
//!
//! let logger = Logger::builder().level(LogLevel::Info).sink(StdoutSink).build();
//! let api = logger.with(&[Field::string("service", "api")]);
//!
//! api.info(
//!     "request handled",
//!     &[
//!         Field::string("path", "/users"),
//!         Field::int("status", 200),
//!         Field::duration("elapsed", Duration::from_millis(12)),
//!     ],
//! );
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        AtomicLevel, BufferProvider, Field, FieldKind, FieldValue, LogLevel, Logger,
        LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, PoolConfig, Result, Sink,
    };
    pub use crate::sinks::{FileSink, MemorySink, NullSink, StderrSink, StdoutSink, SyncWriter};
}

pub use crate::core::{
    encoder, AtomicLevel, BufferProvider, Encoder, Field, FieldKind, FieldValue,
    HeapBufferProvider, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerMetrics, PoolConfig, PoolMetrics, PooledBuffer, Result, ShardedBufferPool, Sink,
    ERROR_KEY, FATAL_EXIT_CODE,
};
