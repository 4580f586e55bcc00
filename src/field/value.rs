//! Decoding of typed fields into dynamic values.

use std::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde::ser::{Serialize, SerializeTuple, Serializer};
use thiserror::Error;

use crate::field::error::LoggedError;
use crate::field::kind::FieldKind;
use crate::field::typed::{Field, Payload};

/// Errors raised while decoding a field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The numeric kind code is not part of [`FieldKind`].
    #[error("unknown field kind: {0}")]
    UnknownFieldKind(u8),

    /// The payload stored on the field does not belong to its kind.
    #[error("field `{key}` of kind {kind} carries a mismatched payload")]
    PayloadMismatch { key: String, kind: FieldKind },
}

/// Complex number as a `(re, im)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

impl<T: fmt::Display + PartialOrd + Default> fmt::Display for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im < T::default() {
            write!(f, "({}{}i)", self.re, self.im)
        } else {
            write!(f, "({}+{}i)", self.re, self.im)
        }
    }
}

impl<T: Serialize> Serialize for Complex<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.re)?;
        tuple.serialize_element(&self.im)?;
        tuple.end()
    }
}

/// Dynamic value of a decoded field.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Str(String),
    I64(i64),
    I32(i32),
    I16(i16),
    I8(i8),
    U64(u64),
    U32(u32),
    U16(u16),
    U8(u8),
    F64(f64),
    F32(f32),
    Bool(bool),
    Duration(TimeDelta),
    Time(DateTime<FixedOffset>),
    Binary(Vec<u8>),
    ByteString(Vec<u8>),
    Complex64(Complex<f32>),
    Complex128(Complex<f64>),
    Error(LoggedError),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::I64(v) => write!(f, "{v}"),
            FieldValue::I32(v) => write!(f, "{v}"),
            FieldValue::I16(v) => write!(f, "{v}"),
            FieldValue::I8(v) => write!(f, "{v}"),
            FieldValue::U64(v) => write!(f, "{v}"),
            FieldValue::U32(v) => write!(f, "{v}"),
            FieldValue::U16(v) => write!(f, "{v}"),
            FieldValue::U8(v) => write!(f, "{v}"),
            FieldValue::F64(v) => write!(f, "{v}"),
            FieldValue::F32(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Duration(d) => write_seconds(f, d),
            FieldValue::Time(t) => f.write_str(&t.to_rfc3339()),
            FieldValue::Binary(bytes) => {
                f.write_str("[")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{b}")?;
                }
                f.write_str("]")
            }
            FieldValue::ByteString(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            FieldValue::Complex64(c) => write!(f, "{c}"),
            FieldValue::Complex128(c) => write!(f, "{c}"),
            FieldValue::Error(e) => write!(f, "{e}"),
        }
    }
}

/// Render as decimal seconds, e.g. `1.5s`, `-2s`, `0.00025s`.
fn write_seconds(f: &mut fmt::Formatter<'_>, d: &TimeDelta) -> fmt::Result {
    let nanos = d
        .num_nanoseconds()
        .unwrap_or_else(|| d.num_milliseconds().saturating_mul(1_000_000));
    let sign = if nanos < 0 { "-" } else { "" };
    let abs = nanos.unsigned_abs();
    let (secs, frac) = (abs / 1_000_000_000, abs % 1_000_000_000);
    if frac == 0 {
        write!(f, "{sign}{secs}s")
    } else {
        let digits = format!("{frac:09}");
        write!(f, "{sign}{secs}.{}s", digits.trim_end_matches('0'))
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Str(s) => serializer.serialize_str(s),
            FieldValue::I64(v) => serializer.serialize_i64(*v),
            FieldValue::I32(v) => serializer.serialize_i32(*v),
            FieldValue::I16(v) => serializer.serialize_i16(*v),
            FieldValue::I8(v) => serializer.serialize_i8(*v),
            FieldValue::U64(v) => serializer.serialize_u64(*v),
            FieldValue::U32(v) => serializer.serialize_u32(*v),
            FieldValue::U16(v) => serializer.serialize_u16(*v),
            FieldValue::U8(v) => serializer.serialize_u8(*v),
            FieldValue::F64(v) => serializer.serialize_f64(*v),
            FieldValue::F32(v) => serializer.serialize_f32(*v),
            FieldValue::Bool(v) => serializer.serialize_bool(*v),
            // nanoseconds; overflow only past ~292 years
            FieldValue::Duration(d) => match d.num_nanoseconds() {
                Some(nanos) => serializer.serialize_i64(nanos),
                None => serializer.serialize_i64(d.num_milliseconds().saturating_mul(1_000_000)),
            },
            FieldValue::Time(t) => serializer.serialize_str(&t.to_rfc3339()),
            FieldValue::Binary(bytes) => serializer.serialize_bytes(bytes),
            FieldValue::ByteString(bytes) => serializer.serialize_str(&String::from_utf8_lossy(bytes)),
            FieldValue::Complex64(c) => c.serialize(serializer),
            FieldValue::Complex128(c) => c.serialize(serializer),
            FieldValue::Error(e) => serializer.serialize_str(&e.to_string()),
        }
    }
}

/// Decode a field into its dynamic value.
///
/// Returns `Ok(None)` for Skip fields. Integer kinds truncate the 64-bit slot
/// to their width; float kinds reinterpret its bits.
pub fn decode(field: &Field) -> Result<Option<FieldValue>, DecodeError> {
    let slot = field.integer();
    let mismatch = || DecodeError::PayloadMismatch {
        key: field.key().to_string(),
        kind: field.kind(),
    };

    let value = match (field.kind(), field.payload()) {
        (FieldKind::String, Payload::Str(s)) => FieldValue::Str(s.to_string()),
        (FieldKind::Int64, _) => FieldValue::I64(slot),
        (FieldKind::Int32, _) => FieldValue::I32(slot as i32),
        (FieldKind::Int16, _) => FieldValue::I16(slot as i16),
        (FieldKind::Int8, _) => FieldValue::I8(slot as i8),
        (FieldKind::Uint64, _) => FieldValue::U64(slot as u64),
        (FieldKind::Uint32, _) => FieldValue::U32(slot as u32),
        (FieldKind::Uint16, _) => FieldValue::U16(slot as u16),
        (FieldKind::Uint8, _) => FieldValue::U8(slot as u8),
        (FieldKind::Float64, _) => FieldValue::F64(f64::from_bits(slot as u64)),
        (FieldKind::Float32, _) => FieldValue::F32(f32::from_bits(slot as u32)),
        (FieldKind::Bool, _) => FieldValue::Bool(slot == 1),
        (FieldKind::Duration, _) => FieldValue::Duration(TimeDelta::nanoseconds(slot)),
        (FieldKind::Time, Payload::Zone(zone)) => {
            FieldValue::Time(DateTime::<Utc>::from_timestamp_nanos(slot).with_timezone(zone))
        }
        (FieldKind::Time, Payload::None) => FieldValue::Time(
            DateTime::<Utc>::from_timestamp_nanos(slot).fixed_offset(),
        ),
        (FieldKind::Binary, Payload::Bytes(b)) => FieldValue::Binary(b.to_vec()),
        (FieldKind::ByteString, Payload::Bytes(b)) => FieldValue::ByteString(b.to_vec()),
        (FieldKind::Complex64, Payload::Complex64(c)) => FieldValue::Complex64(*c),
        (FieldKind::Complex128, Payload::Complex128(c)) => FieldValue::Complex128(*c),
        (FieldKind::Error, Payload::Error(e)) => FieldValue::Error(e.clone()),
        (FieldKind::Stringer, Payload::Stringer(s)) => FieldValue::Str(s.to_string()),
        (FieldKind::Skip, _) => return Ok(None),
        (
            FieldKind::String
            | FieldKind::Time
            | FieldKind::Binary
            | FieldKind::ByteString
            | FieldKind::Complex64
            | FieldKind::Complex128
            | FieldKind::Error
            | FieldKind::Stringer,
            _,
        ) => return Err(mismatch()),
    };
    Ok(Some(value))
}
