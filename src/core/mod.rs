//! Core logger types and traits

pub mod buffer_pool;
pub mod config;
pub mod encoder;
pub mod error;
pub mod field;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod sink;

pub use buffer_pool::{BufferProvider, HeapBufferProvider, PooledBuffer, ShardedBufferPool};
pub use config::{LoggerConfig, PoolConfig};
pub use encoder::Encoder;
pub use error::{LoggerError, Result};
pub use field::{Field, FieldKind, FieldValue, ERROR_KEY};
pub use log_level::{AtomicLevel, LogLevel};
pub use logger::{Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use metrics::{LoggerMetrics, PoolMetrics};
pub use sink::Sink;
