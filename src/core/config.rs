//! Logger configuration values
//!
//! Both types derive serde so they can be embedded in an application's own
//! configuration file. Loading that file is left to the application.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::sink::Sink;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default number of idle buffers kept across all shards
pub const DEFAULT_POOL_SIZE: usize = 512;

/// Default number of independent free lists
pub const DEFAULT_SHARD_COUNT: usize = 16;

/// Default capacity of a freshly allocated buffer, in bytes
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Buffers that grew past this capacity are dropped instead of pooled
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 64 * 1024;

/// Sizing for [`ShardedBufferPool`](crate::core::ShardedBufferPool).
///
/// # Examples
///
/// ```
/// use rust_json_logger::PoolConfig;
///
/// let config = PoolConfig::default()
///     .with_pool_size(1024)
///     .with_shard_count(32);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub pool_size: usize,
    pub shard_count: usize,
    pub default_buffer_size: usize,
    pub max_buffer_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            shard_count: DEFAULT_SHARD_COUNT,
            default_buffer_size: DEFAULT_BUFFER_SIZE,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    #[must_use]
    pub fn with_shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = shard_count;
        self
    }

    #[must_use]
    pub fn with_default_buffer_size(mut self, size: usize) -> Self {
        self.default_buffer_size = size;
        self
    }

    #[must_use]
    pub fn with_max_buffer_size(mut self, size: usize) -> Self {
        self.max_buffer_size = size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(LoggerError::config("PoolConfig", "pool_size must be positive"));
        }
        if self.shard_count == 0 {
            return Err(LoggerError::config("PoolConfig", "shard_count must be positive"));
        }
        if self.max_buffer_size < self.default_buffer_size {
            return Err(LoggerError::config(
                "PoolConfig",
                format!(
                    "max_buffer_size ({}) is smaller than default_buffer_size ({})",
                    self.max_buffer_size, self.default_buffer_size
                ),
            ));
        }
        Ok(())
    }
}

/// Construction parameters for a root [`Logger`](crate::core::Logger).
///
/// `output` defaults to a mutex-guarded stderr sink and `pool` to
/// [`PoolConfig::default`].
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    #[serde(skip)]
    pub output: Option<Arc<dyn Sink>>,
    pub level: LogLevel,
    pub pool: Option<PoolConfig>,
}

impl LoggerConfig {
    #[must_use]
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: Arc<dyn Sink>) -> Self {
        self.output = Some(output);
        self
    }

    #[must_use]
    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn validate(&self) -> Result<()> {
        match &self.pool {
            Some(pool) => pool.validate(),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("output", &self.output.as_ref().map(|_| "<sink>"))
            .field("level", &self.level)
            .field("pool", &self.pool)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.pool_size, 512);
        assert_eq!(config.shard_count, 16);
        assert_eq!(config.default_buffer_size, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pool_validate_rejects_zero() {
        let err = PoolConfig::new().with_shard_count(0).validate().unwrap_err();
        assert!(err.to_string().contains("shard_count"));

        let err = PoolConfig::new().with_pool_size(0).validate().unwrap_err();
        assert!(err.to_string().contains("pool_size"));
    }

    #[test]
    fn test_pool_validate_rejects_inverted_sizes() {
        let config = PoolConfig::new()
            .with_default_buffer_size(4096)
            .with_max_buffer_size(1024);
        assert!(matches!(
            config.validate(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_logger_config_deserialize() {
        let config: LoggerConfig =
            serde_json::from_str(r#"{"level":"WARN","pool":{"shard_count":4}}"#).unwrap();
        assert_eq!(config.level, LogLevel::Warn);
        assert!(config.output.is_none());

        let pool = config.pool.expect("pool section");
        assert_eq!(pool.shard_count, 4);
        assert_eq!(pool.pool_size, DEFAULT_POOL_SIZE);
    }

    #[test]
    fn test_logger_config_empty_document() {
        let config: LoggerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert!(config.pool.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logger_config_debug_hides_sink() {
        let config = LoggerConfig::new(LogLevel::Debug)
            .with_output(Arc::new(crate::sinks::NullSink));
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("<sink>"));
        assert!(rendered.contains("Debug"));
    }
}
