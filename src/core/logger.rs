//! Main logger implementation
//!
//! A record is assembled in one pooled buffer and written to the sink in one
//! call:
//!
//! ```text
//! {"level":"INFO","ts":"2024-03-01T12:00:00.123456789Z","msg":"...",<context>,<fields>}\n
//! ```
//!
//! Context fields attached with [`Logger::with`] are encoded once, when the
//! child logger is created, and copied verbatim into every record after that.

use super::{
    buffer_pool::{BufferProvider, PooledBuffer, ShardedBufferPool},
    config::{LoggerConfig, PoolConfig},
    encoder,
    error::Result,
    field::Field,
    log_level::{AtomicLevel, LogLevel},
    metrics::LoggerMetrics,
    sink::Sink,
};
use crate::sinks::{NullSink, SyncWriter};
use chrono::{DateTime, Utc};
use std::fmt;
use std::io;
use std::sync::Arc;

/// Exit status used by [`Logger::fatal`].
pub const FATAL_EXIT_CODE: i32 = 1;

/// Structured JSON logger.
///
/// Cloning is cheap and yields a handle to the same logger. Loggers derived
/// with [`with`](Logger::with) share the sink, the level threshold, the
/// buffer provider and the metrics of their parent; only the pre-encoded
/// context differs.
///
/// # Example
///
/// ```
/// use rust_json_logger::prelude::*;
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let logger = Logger::builder()
///     .level(LogLevel::Info)
///     .output(sink.clone())
///     .build();
///
/// let api = logger.with(&[Field::string("service", "api")]);
/// api.info("server started", &[Field::string("addr", ":8080"), Field::int("workers", 4)]);
/// api.debug("suppressed", &[]);
///
/// let lines = sink.lines();
/// assert_eq!(lines.len(), 1);
/// assert!(lines[0].ends_with(r#""msg":"server started","service":"api","addr":":8080","workers":4}"#));
/// ```
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn Sink>,
    level: Arc<AtomicLevel>,
    buffers: Arc<dyn BufferProvider>,
    metrics: Arc<LoggerMetrics>,
    context: Arc<[u8]>,
}

impl Logger {
    /// Build a root logger from configuration. Never fails: a missing output
    /// falls back to stderr and invalid pool sizes are normalized.
    #[must_use]
    pub fn new(config: LoggerConfig) -> Self {
        let mut builder = LoggerBuilder::new().level(config.level);
        if let Some(output) = config.output {
            builder = builder.output(output);
        }
        if let Some(pool) = config.pool {
            builder = builder.pool_config(pool);
        }
        builder.build()
    }

    /// Logger that discards everything, with the lowest threshold so every
    /// call still runs the full encode path.
    #[must_use]
    pub fn nop() -> Self {
        Self::builder().level(LogLevel::Debug).sink(NullSink).build()
    }

    /// Derive a logger whose records also carry `fields`.
    ///
    /// The fields are encoded now, once. The receiver is not modified, so
    /// any number of threads may derive children from the same parent. With
    /// no fields this returns a handle to the receiver itself.
    #[must_use]
    pub fn with(&self, fields: &[Field<'_>]) -> Logger {
        if fields.is_empty() {
            return self.clone();
        }

        let mut buf = PooledBuffer::new(self.buffers.as_ref());
        for field in fields {
            buf.push(b',');
            encoder::append_field(&mut buf, field);
        }

        let context: Arc<[u8]> = self.context.iter().chain(buf.iter()).copied().collect();

        Logger {
            sink: Arc::clone(&self.sink),
            level: Arc::clone(&self.level),
            buffers: Arc::clone(&self.buffers),
            metrics: Arc::clone(&self.metrics),
            context,
        }
    }

    /// Change the threshold for this logger and every logger related to it.
    pub fn set_level(&self, level: LogLevel) {
        self.level.set_level(level);
    }

    pub fn level(&self) -> LogLevel {
        self.level.level()
    }

    /// Whether a call at `level` would produce output.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.level.enabled(level)
    }

    /// Pre-encoded context fields, each prefixed with a comma.
    pub fn context(&self) -> &[u8] {
        &self.context
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Best-effort flush of the sink.
    pub fn flush(&self) {
        let _ = self.sink.flush();
    }

    /// Emit a record at `level` if the threshold allows it.
    ///
    /// This never terminates the process, even at [`LogLevel::Fatal`]; use
    /// [`fatal`](Logger::fatal) for that.
    #[inline]
    pub fn log(&self, level: LogLevel, msg: &str, fields: &[Field<'_>]) {
        if !self.level.enabled(level) {
            return;
        }
        self.write_record(level, msg, fields);
    }

    #[inline]
    pub fn debug(&self, msg: &str, fields: &[Field<'_>]) {
        self.log(LogLevel::Debug, msg, fields);
    }

    #[inline]
    pub fn info(&self, msg: &str, fields: &[Field<'_>]) {
        self.log(LogLevel::Info, msg, fields);
    }

    #[inline]
    pub fn warn(&self, msg: &str, fields: &[Field<'_>]) {
        self.log(LogLevel::Warn, msg, fields);
    }

    #[inline]
    pub fn error(&self, msg: &str, fields: &[Field<'_>]) {
        self.log(LogLevel::Error, msg, fields);
    }

    /// Write a `FATAL` record regardless of the threshold, flush the sink and
    /// exit the process with status [`FATAL_EXIT_CODE`].
    ///
    /// No destructors run and nothing else is flushed.
    pub fn fatal(&self, msg: &str, fields: &[Field<'_>]) -> ! {
        self.write_record(LogLevel::Fatal, msg, fields);
        self.flush();
        std::process::exit(FATAL_EXIT_CODE)
    }

    fn write_record(&self, level: LogLevel, msg: &str, fields: &[Field<'_>]) {
        let mut buf = PooledBuffer::new(self.buffers.as_ref());
        encode_record(&mut buf, level, &Utc::now(), msg, &self.context, fields);

        // Logging must not fail the caller; the error is only counted.
        match self.sink.write_record(&buf) {
            Ok(()) => {
                self.metrics.record_written();
            }
            Err(_) => {
                self.metrics.record_write_failure();
            }
        }
    }
}

/// Encode one complete record, newline included, into `dst`.
pub(crate) fn encode_record(
    dst: &mut Vec<u8>,
    level: LogLevel,
    ts: &DateTime<Utc>,
    msg: &str,
    context: &[u8],
    fields: &[Field<'_>],
) {
    dst.extend_from_slice(b"{\"level\":\"");
    dst.extend_from_slice(level.to_str().as_bytes());
    dst.extend_from_slice(b"\",\"ts\":");
    encoder::append_datetime(dst, ts);
    dst.extend_from_slice(b",\"msg\":");
    encoder::append_json_string(dst, msg);

    dst.extend_from_slice(context);

    for field in fields {
        dst.push(b',');
        encoder::append_field(dst, field);
    }

    dst.extend_from_slice(b"}\n");
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level.level())
            .field("context", &String::from_utf8_lossy(&self.context))
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a root [`Logger`] with a fluent API
///
/// # Example
/// ```
/// use rust_json_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .sink(StdoutSink)
///     .pool_config(PoolConfig::default().with_shard_count(4))
///     .build();
/// logger.debug("configured", &[]);
/// ```
pub struct LoggerBuilder {
    level: LogLevel,
    output: Option<Arc<dyn Sink>>,
    pool: PoolConfig,
    buffers: Option<Arc<dyn BufferProvider>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: LogLevel::Info,
            output: None,
            pool: PoolConfig::default(),
            buffers: None,
        }
    }

    /// Set the initial threshold
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Use an already shared sink
    #[must_use = "builder methods return a new value"]
    pub fn output(mut self, output: Arc<dyn Sink>) -> Self {
        self.output = Some(output);
        self
    }

    /// Use `sink`, taking ownership of it
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(self, sink: S) -> Self {
        self.output(Arc::new(sink))
    }

    /// Sizing for the default [`ShardedBufferPool`]. Ignored when a custom
    /// provider is set with [`buffer_provider`](Self::buffer_provider).
    #[must_use = "builder methods return a new value"]
    pub fn pool_config(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Supply buffers from a custom provider instead of the default pool
    #[must_use = "builder methods return a new value"]
    pub fn buffer_provider(mut self, provider: Arc<dyn BufferProvider>) -> Self {
        self.buffers = Some(provider);
        self
    }

    /// Build the Logger, normalizing invalid pool sizes
    pub fn build(self) -> Logger {
        let sink = self
            .output
            .unwrap_or_else(|| Arc::new(SyncWriter::new(io::stderr())));
        let buffers = self
            .buffers
            .unwrap_or_else(|| Arc::new(ShardedBufferPool::new(self.pool)));

        Logger {
            sink,
            level: Arc::new(AtomicLevel::new(self.level)),
            buffers,
            metrics: Arc::new(LoggerMetrics::new()),
            context: Arc::from(Vec::new()),
        }
    }

    /// Build the Logger, rejecting invalid pool sizes
    pub fn try_build(self) -> Result<Logger> {
        if self.buffers.is_none() {
            self.pool.validate()?;
        }
        Ok(self.build())
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
