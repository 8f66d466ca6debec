//! Typed key-value fields attached to log records
//!
//! A [`Field`] borrows its key and any string/byte payload from the caller and
//! is consumed by the encoder within the same call. Numeric, boolean, duration
//! and timestamp payloads are stored inline, so building a field never
//! allocates (except [`Field::error`], which captures the error's message).

use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

/// Key used by [`Field::error`] and [`Field::err`].
pub const ERROR_KEY: &str = "error";

/// Discriminant of a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Int,
    Int64,
    Float64,
    Bool,
    Duration,
    Error,
    Timestamp,
    Bytes,
}

/// Payload of a field.
///
/// `Duration` and `Timestamp` both carry an `i64` count of nanoseconds, but
/// with different meanings: a duration is a raw span, a timestamp is an
/// offset from the Unix epoch. They are rendered differently and must not be
/// swapped.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    String(&'a str),
    Int(i64),
    Int64(i64),
    /// Raw bit pattern, see [`f64::to_bits`].
    Float64(u64),
    Bool(bool),
    /// Span in nanoseconds.
    Duration(i64),
    Error(Cow<'a, str>),
    /// Nanoseconds since the Unix epoch, UTC.
    Timestamp(i64),
    Bytes(&'a [u8]),
}

impl FieldValue<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Int64(_) => FieldKind::Int64,
            FieldValue::Float64(_) => FieldKind::Float64,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Duration(_) => FieldKind::Duration,
            FieldValue::Error(_) => FieldKind::Error,
            FieldValue::Timestamp(_) => FieldKind::Timestamp,
            FieldValue::Bytes(_) => FieldKind::Bytes,
        }
    }

    /// Recover the float from a `Float64` payload.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float64(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// Integer payload of `Int` and `Int64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) | FieldValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Text payload of `String` and `Error`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            FieldValue::Error(s) => Some(s),
            _ => None,
        }
    }
}

/// A single structured field: key plus typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    key: &'a str,
    value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    #[inline]
    pub const fn new(key: &'a str, value: FieldValue<'a>) -> Self {
        Self { key, value }
    }

    #[inline]
    pub const fn string(key: &'a str, val: &'a str) -> Self {
        Self::new(key, FieldValue::String(val))
    }

    #[inline]
    pub const fn int(key: &'a str, val: isize) -> Self {
        Self::new(key, FieldValue::Int(val as i64))
    }

    #[inline]
    pub const fn int64(key: &'a str, val: i64) -> Self {
        Self::new(key, FieldValue::Int64(val))
    }

    #[inline]
    pub fn float64(key: &'a str, val: f64) -> Self {
        Self::new(key, FieldValue::Float64(val.to_bits()))
    }

    #[inline]
    pub const fn bool(key: &'a str, val: bool) -> Self {
        Self::new(key, FieldValue::Bool(val))
    }

    /// Non-negative span; saturates at `i64::MAX` nanoseconds (~292 years).
    #[inline]
    pub fn duration(key: &'a str, val: Duration) -> Self {
        let nanos = i64::try_from(val.as_nanos()).unwrap_or(i64::MAX);
        Self::new(key, FieldValue::Duration(nanos))
    }

    /// Signed span, e.g. the difference of two timestamps.
    #[inline]
    pub fn signed_duration(key: &'a str, val: chrono::Duration) -> Self {
        let nanos = val.num_nanoseconds().unwrap_or(if val < chrono::Duration::zero() {
            i64::MIN
        } else {
            i64::MAX
        });
        Self::new(key, FieldValue::Duration(nanos))
    }

    /// Point in time, stored as nanoseconds since the epoch.
    ///
    /// Accepts anything convertible to `DateTime<Utc>`, including
    /// `SystemTime`. Instants outside roughly 1677..2262 saturate.
    #[inline]
    pub fn timestamp(key: &'a str, val: impl Into<DateTime<Utc>>) -> Self {
        let dt: DateTime<Utc> = val.into();
        let nanos = dt.timestamp_nanos_opt().unwrap_or(if dt.timestamp() < 0 {
            i64::MIN
        } else {
            i64::MAX
        });
        Self::new(key, FieldValue::Timestamp(nanos))
    }

    #[inline]
    pub const fn bytes(key: &'a str, val: &'a [u8]) -> Self {
        Self::new(key, FieldValue::Bytes(val))
    }

    /// Error field under the fixed key `"error"`.
    ///
    /// `None` yields an empty string field rather than an error-kind field.
    pub fn error<E>(err: Option<&E>) -> Field<'static>
    where
        E: fmt::Display + ?Sized,
    {
        match err {
            None => Field::new(ERROR_KEY, FieldValue::String("")),
            Some(e) => Field::new(ERROR_KEY, FieldValue::Error(Cow::Owned(e.to_string()))),
        }
    }

    /// Shorthand for `Field::error(Some(err))`.
    pub fn err<E>(err: &E) -> Field<'static>
    where
        E: fmt::Display + ?Sized,
    {
        Field::error(Some(err))
    }

    #[inline]
    pub fn key(&self) -> &'a str {
        self.key
    }

    #[inline]
    pub fn value(&self) -> &FieldValue<'a> {
        &self.value
    }

    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }
}
