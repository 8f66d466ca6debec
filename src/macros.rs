//! Logging macros that take fields as trailing arguments.
//!
//! These are thin wrappers over the [`Logger`](crate::Logger) methods: the
//! fields are collected into a stack array, so the macros add no allocation.
//!
//! # Examples
//!
//! ```
//! use rust_json_logger::prelude::*;
//! use rust_json_logger::info;
//!
//! let logger = Logger::nop();
//!
//! // Message only
//! info!(logger, "server started");
//!
//! // With fields
//! let port = 8080;
//! info!(logger, "listening", Field::int("port", port), Field::bool("tls", true));
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_json_logger::prelude::*;
/// # let logger = Logger::nop();
/// use rust_json_logger::log;
/// log!(logger, LogLevel::Info, "simple message");
/// log!(logger, LogLevel::Error, "request failed", Field::int("status", 500));
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr $(, $field:expr)* $(,)?) => {
        $logger.log($level, $msg, &[$($field),*])
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_json_logger::prelude::*;
/// # let logger = Logger::nop();
/// use rust_json_logger::debug;
/// debug!(logger, "cache lookup", Field::string("key", "user:42"));
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $msg:expr $(, $field:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $msg $(, $field)*)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_json_logger::prelude::*;
/// # let logger = Logger::nop();
/// use rust_json_logger::info;
/// info!(logger, "application started");
/// info!(logger, "processing", Field::int("items", 100));
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $msg:expr $(, $field:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Info, $msg $(, $field)*)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_json_logger::prelude::*;
/// # let logger = Logger::nop();
/// use rust_json_logger::warn;
/// warn!(logger, "low disk space", Field::float64("free_ratio", 0.04));
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $msg:expr $(, $field:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $msg $(, $field)*)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_json_logger::prelude::*;
/// # let logger = Logger::nop();
/// use rust_json_logger::error;
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
/// error!(logger, "failed to connect", Field::err(&err));
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $msg:expr $(, $field:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Error, $msg $(, $field)*)
    };
}

/// Log a fatal message and exit the process.
///
/// # Examples
///
/// ```no_run
/// # use rust_json_logger::prelude::*;
/// # let logger = Logger::default();
/// use rust_json_logger::fatal;
/// fatal!(logger, "unable to bind", Field::string("addr", "0.0.0.0:80"));
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $msg:expr $(, $field:expr)* $(,)?) => {
        $logger.fatal($msg, &[$($field),*])
    };
}
