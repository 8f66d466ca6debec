//! Log level definitions and the shared atomic threshold

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "UPPERCASE")]
#[repr(i8)]
pub enum LogLevel {
    Debug = -1,
    #[default]
    Info = 0,
    Warn = 1,
    Error = 2,
    Fatal = 3,
}

impl LogLevel {
    /// All levels, lowest to highest.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub const fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    #[inline]
    const fn as_i8(self) -> i8 {
        self as i8
    }

    #[inline]
    const fn from_i8(v: i8) -> LogLevel {
        match v {
            i8::MIN..=-1 => LogLevel::Debug,
            0 => LogLevel::Info,
            1 => LogLevel::Warn,
            2 => LogLevel::Error,
            _ => LogLevel::Fatal,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}

/// Severity threshold shared by a logger and everything derived from it.
///
/// A single atomic byte. Reads vastly outnumber writes, and a racing
/// `set_level` only has to be observed eventually, so both sides use
/// `Relaxed`.
#[derive(Debug)]
pub struct AtomicLevel {
    v: AtomicI8,
}

impl AtomicLevel {
    pub const fn new(level: LogLevel) -> Self {
        Self {
            v: AtomicI8::new(level.as_i8()),
        }
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_i8(self.v.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_level(&self, level: LogLevel) {
        self.v.store(level.as_i8(), Ordering::Relaxed);
    }

    /// True iff `level` is at or above the current threshold.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level.as_i8() >= self.v.load(Ordering::Relaxed)
    }
}

impl Default for AtomicLevel {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}
