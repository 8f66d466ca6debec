//! Byte-level JSON encoding
//!
//! Every function here appends to a caller-owned `Vec<u8>` and performs no
//! allocation beyond growing that vector. Output is always valid JSON:
//! strings are escaped per RFC 8259, non-finite floats are emitted as quoted
//! strings, and invalid UTF-8 is replaced by `\ufffd` escapes.

use super::field::{Field, FieldValue};
use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use std::io::Write;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Whole floats below this magnitude take the integer fast path.
const FLOAT_INT_FAST_PATH_LIMIT: f64 = 1e15;

/// 2^63; floats at or above this no longer fit an `i64` integer part.
const FLOAT_I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Bytes that can be copied into a JSON string verbatim: printable ASCII
/// except `"` and `\`.
static SAFE_SET: [bool; 256] = {
    let mut table = [false; 256];
    let mut i = 0x20;
    while i <= 0x7E {
        table[i] = true;
        i += 1;
    }
    table[b'"' as usize] = false;
    table[b'\\' as usize] = false;
    table
};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Append `s` as a quoted, escaped JSON string.
#[inline]
pub fn append_json_string(dst: &mut Vec<u8>, s: &str) {
    append_json_bytes(dst, s.as_bytes());
}

/// Append arbitrary bytes as a quoted JSON string, treating them as UTF-8
/// text and replacing invalid sequences.
#[inline]
pub fn append_json_bytes(dst: &mut Vec<u8>, s: &[u8]) {
    dst.push(b'"');
    append_escaped(dst, s);
    dst.push(b'"');
}

/// Append `"key":`.
#[inline]
pub fn append_key(dst: &mut Vec<u8>, key: &str) {
    dst.push(b'"');
    append_escaped(dst, key.as_bytes());
    dst.extend_from_slice(b"\":");
}

/// Append the escaped body of a JSON string (no surrounding quotes).
///
/// Runs of safe bytes are copied in one call; everything else goes through
/// the per-byte slow path.
pub fn append_escaped(dst: &mut Vec<u8>, s: &[u8]) {
    let mut i = 0;
    while i < s.len() {
        let start = i;
        while i < s.len() && SAFE_SET[s[i] as usize] {
            i += 1;
        }
        if i > start {
            dst.extend_from_slice(&s[start..i]);
        }
        if i >= s.len() {
            break;
        }

        let b = s[i];
        if b >= 0x80 {
            match utf8_sequence_len(&s[i..]) {
                Some(n) => {
                    dst.extend_from_slice(&s[i..i + n]);
                    i += n;
                }
                None => {
                    dst.extend_from_slice(b"\\ufffd");
                    i += 1;
                }
            }
            continue;
        }

        match b {
            b'"' => dst.extend_from_slice(b"\\\""),
            b'\\' => dst.extend_from_slice(b"\\\\"),
            b'\n' => dst.extend_from_slice(b"\\n"),
            b'\r' => dst.extend_from_slice(b"\\r"),
            b'\t' => dst.extend_from_slice(b"\\t"),
            0x00..=0x1F => dst.extend_from_slice(&[
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX_DIGITS[(b >> 4) as usize],
                HEX_DIGITS[(b & 0x0F) as usize],
            ]),
            // DEL is legal unescaped inside a JSON string.
            _ => dst.push(b),
        }
        i += 1;
    }
}

/// Length of the well-formed UTF-8 sequence at the start of `s`, or `None`
/// if the leading byte does not begin one.
#[inline]
fn utf8_sequence_len(s: &[u8]) -> Option<usize> {
    let width = match s[0] {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return None,
    };
    if s.len() < width {
        return None;
    }
    // Rejects overlong forms, surrogates and code points past U+10FFFF.
    std::str::from_utf8(&s[..width]).ok().map(|_| width)
}

#[inline]
pub fn append_bool(dst: &mut Vec<u8>, v: bool) {
    if v {
        dst.extend_from_slice(b"true");
    } else {
        dst.extend_from_slice(b"false");
    }
}

/// Append a signed integer in decimal.
pub fn append_i64(dst: &mut Vec<u8>, mut v: i64) {
    if v == 0 {
        dst.push(b'0');
        return;
    }
    if v < 0 {
        dst.push(b'-');
        if v == i64::MIN {
            dst.extend_from_slice(b"9223372036854775808");
            return;
        }
        v = -v;
    }
    let mut buf = [0u8; 20];
    let mut i = buf.len();
    while v > 0 {
        i -= 1;
        buf[i] = b'0' + (v % 10) as u8;
        v /= 10;
    }
    dst.extend_from_slice(&buf[i..]);
}

/// Append a float.
///
/// NaN and infinities become the quoted strings `"NaN"`, `"+Inf"` and
/// `"-Inf"`. Whole values below 1e15 print as integers. Everything else
/// prints as `<int>.<fraction>` with the fraction rounded to six digits and
/// trailing zeros trimmed (at least one digit is kept).
pub fn append_f64(dst: &mut Vec<u8>, v: f64) {
    if v.is_nan() {
        dst.extend_from_slice(b"\"NaN\"");
        return;
    }
    if v == f64::INFINITY {
        dst.extend_from_slice(b"\"+Inf\"");
        return;
    }
    if v == f64::NEG_INFINITY {
        dst.extend_from_slice(b"\"-Inf\"");
        return;
    }
    if v == 0.0 {
        dst.push(b'0');
        return;
    }

    if v < 0.0 {
        dst.push(b'-');
    }
    let v = v.abs();

    if v.fract() == 0.0 && v < FLOAT_INT_FAST_PATH_LIMIT {
        append_i64(dst, v as i64);
        return;
    }

    if v >= FLOAT_I64_LIMIT {
        // Writing to a Vec cannot fail.
        let _ = write!(dst, "{}", v);
        return;
    }

    let trunc = v.trunc();
    let mut int_part = trunc as i64;
    let mut frac_part = ((v - trunc) * 1e6).round() as i64;
    if frac_part >= 1_000_000 {
        int_part += 1;
        frac_part = 0;
    }

    append_i64(dst, int_part);
    dst.push(b'.');

    let mut fbuf = [b'0'; 6];
    for slot in fbuf.iter_mut().rev() {
        *slot = b'0' + (frac_part % 10) as u8;
        frac_part /= 10;
    }
    let mut end = fbuf.len();
    while end > 1 && fbuf[end - 1] == b'0' {
        end -= 1;
    }
    dst.extend_from_slice(&fbuf[..end]);
}

/// Append a span of `nanos` nanoseconds as fractional seconds.
pub fn append_duration(dst: &mut Vec<u8>, nanos: i64) {
    let secs = nanos / NANOS_PER_SEC;
    let rem = nanos % NANOS_PER_SEC;
    append_f64(dst, secs as f64 + rem as f64 / 1e9);
}

/// Append a quoted RFC 3339 UTC timestamp for `nanos` since the epoch.
pub fn append_timestamp(dst: &mut Vec<u8>, nanos: i64) {
    append_datetime(dst, &Utc.timestamp_nanos(nanos));
}

/// Append `dt` as a quoted `YYYY-MM-DDTHH:MM:SS[.fraction]Z` string.
///
/// The fraction carries up to nine digits with trailing zeros removed and is
/// omitted when the sub-second part is zero.
pub fn append_datetime(dst: &mut Vec<u8>, dt: &DateTime<Utc>) {
    dst.push(b'"');

    let year = dt.year();
    if (0..=9999).contains(&year) {
        push_digits(dst, year as u32, 4);
    } else {
        append_i64(dst, i64::from(year));
    }
    dst.push(b'-');
    push_digits(dst, dt.month(), 2);
    dst.push(b'-');
    push_digits(dst, dt.day(), 2);
    dst.push(b'T');
    push_digits(dst, dt.hour(), 2);
    dst.push(b':');
    push_digits(dst, dt.minute(), 2);
    dst.push(b':');
    push_digits(dst, dt.second(), 2);

    // Leap seconds are folded into the 59th second.
    let nanos = dt.nanosecond() % NANOS_PER_SEC as u32;
    if nanos != 0 {
        dst.push(b'.');
        let mut fbuf = [b'0'; 9];
        let mut n = nanos;
        for slot in fbuf.iter_mut().rev() {
            *slot = b'0' + (n % 10) as u8;
            n /= 10;
        }
        let mut end = fbuf.len();
        while fbuf[end - 1] == b'0' {
            end -= 1;
        }
        dst.extend_from_slice(&fbuf[..end]);
    }

    dst.extend_from_slice(b"Z\"");
}

/// Zero-padded decimal of exactly `width` digits (`v` must fit).
#[inline]
fn push_digits(dst: &mut Vec<u8>, mut v: u32, width: usize) {
    let mut buf = [b'0'; 4];
    for slot in buf[..width].iter_mut().rev() {
        *slot = b'0' + (v % 10) as u8;
        v /= 10;
    }
    dst.extend_from_slice(&buf[..width]);
}

/// Append `"key":value` for one field.
pub fn append_field(dst: &mut Vec<u8>, field: &Field<'_>) {
    append_key(dst, field.key());
    match field.value() {
        FieldValue::String(s) => append_json_string(dst, s),
        FieldValue::Error(s) => append_json_string(dst, s),
        FieldValue::Int(v) | FieldValue::Int64(v) => append_i64(dst, *v),
        FieldValue::Float64(bits) => append_f64(dst, f64::from_bits(*bits)),
        FieldValue::Bool(v) => append_bool(dst, *v),
        FieldValue::Duration(nanos) => append_duration(dst, *nanos),
        FieldValue::Timestamp(nanos) => append_timestamp(dst, *nanos),
        FieldValue::Bytes(b) => append_json_bytes(dst, b),
    }
}

/// Method-style access to the append functions over a borrowed buffer.
pub struct Encoder<'a> {
    buf: &'a mut Vec<u8>,
}

impl<'a> Encoder<'a> {
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        Self { buf }
    }

    #[inline]
    pub fn append_byte(&mut self, b: u8) {
        self.buf.push(b);
    }

    /// Append pre-encoded bytes verbatim.
    #[inline]
    pub fn append_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    #[inline]
    pub fn append_json_string(&mut self, s: &str) {
        append_json_string(self.buf, s);
    }

    #[inline]
    pub fn append_key(&mut self, key: &str) {
        append_key(self.buf, key);
    }

    #[inline]
    pub fn append_i64(&mut self, v: i64) {
        append_i64(self.buf, v);
    }

    #[inline]
    pub fn append_f64(&mut self, v: f64) {
        append_f64(self.buf, v);
    }

    #[inline]
    pub fn append_bool(&mut self, v: bool) {
        append_bool(self.buf, v);
    }

    #[inline]
    pub fn append_datetime(&mut self, dt: &DateTime<Utc>) {
        append_datetime(self.buf, dt);
    }

    #[inline]
    pub fn append_timestamp(&mut self, nanos: i64) {
        append_timestamp(self.buf, nanos);
    }

    #[inline]
    pub fn append_duration(&mut self, nanos: i64) {
        append_duration(self.buf, nanos);
    }

    #[inline]
    pub fn append_field(&mut self, field: &Field<'_>) {
        append_field(self.buf, field);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf
    }
}
