//! Typed log field and its constructors.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::field::error::LoggedError;
use crate::field::kind::FieldKind;
use crate::field::value::{Complex, DecodeError};

/// Key under which the error of an entry is stored.
pub const ERROR_KEY: &str = "error";

/// Key prefix marking a field as a report tag (`tag.region` → tag `region`).
pub const TAG_PREFIX: &str = "tag.";

/// Auxiliary payload of a field; which variant is valid depends on the kind.
#[derive(Clone)]
pub enum Payload {
    None,
    Str(Arc<str>),
    Bytes(Arc<[u8]>),
    Complex64(Complex<f32>),
    Complex128(Complex<f64>),
    Zone(FixedOffset),
    Error(LoggedError),
    Stringer(Arc<dyn fmt::Display + Send + Sync>),
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::None => f.write_str("None"),
            Payload::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Payload::Bytes(b) => f.debug_tuple("Bytes").field(b).finish(),
            Payload::Complex64(c) => f.debug_tuple("Complex64").field(c).finish(),
            Payload::Complex128(c) => f.debug_tuple("Complex128").field(c).finish(),
            Payload::Zone(z) => f.debug_tuple("Zone").field(z).finish(),
            Payload::Error(e) => f.debug_tuple("Error").field(e).finish(),
            Payload::Stringer(s) => f.debug_tuple("Stringer").field(&s.to_string()).finish(),
        }
    }
}

/// One structured key/value attribute of a log entry.
#[derive(Debug, Clone)]
pub struct Field {
    key: String,
    kind: FieldKind,
    integer: i64,
    payload: Payload,
}

impl Field {
    fn slot(key: impl Into<String>, kind: FieldKind, integer: i64) -> Self {
        Self {
            key: key.into(),
            kind,
            integer,
            payload: Payload::None,
        }
    }

    fn with_payload(key: impl Into<String>, kind: FieldKind, payload: Payload) -> Self {
        Self {
            key: key.into(),
            kind,
            integer: 0,
            payload,
        }
    }

    /// Rebuild a field from its raw parts.
    ///
    /// Fails on an unknown kind code. A payload that does not fit the kind is
    /// accepted here and rejected when the field is decoded.
    pub fn from_parts(
        key: impl Into<String>,
        kind_code: u8,
        integer: i64,
        payload: Payload,
    ) -> Result<Self, DecodeError> {
        let kind = FieldKind::from_code(kind_code)?;
        Ok(Self {
            key: key.into(),
            kind,
            integer,
            payload,
        })
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        let value: String = value.into();
        Self::with_payload(key, FieldKind::String, Payload::Str(value.into()))
    }

    pub fn i64(key: impl Into<String>, value: i64) -> Self {
        Self::slot(key, FieldKind::Int64, value)
    }

    pub fn i32(key: impl Into<String>, value: i32) -> Self {
        Self::slot(key, FieldKind::Int32, i64::from(value))
    }

    pub fn i16(key: impl Into<String>, value: i16) -> Self {
        Self::slot(key, FieldKind::Int16, i64::from(value))
    }

    pub fn i8(key: impl Into<String>, value: i8) -> Self {
        Self::slot(key, FieldKind::Int8, i64::from(value))
    }

    pub fn u64(key: impl Into<String>, value: u64) -> Self {
        Self::slot(key, FieldKind::Uint64, value as i64)
    }

    pub fn u32(key: impl Into<String>, value: u32) -> Self {
        Self::slot(key, FieldKind::Uint32, i64::from(value))
    }

    pub fn u16(key: impl Into<String>, value: u16) -> Self {
        Self::slot(key, FieldKind::Uint16, i64::from(value))
    }

    pub fn u8(key: impl Into<String>, value: u8) -> Self {
        Self::slot(key, FieldKind::Uint8, i64::from(value))
    }

    /// Float stored as its raw bit pattern.
    pub fn f64(key: impl Into<String>, value: f64) -> Self {
        Self::slot(key, FieldKind::Float64, value.to_bits() as i64)
    }

    pub fn f32(key: impl Into<String>, value: f32) -> Self {
        Self::slot(key, FieldKind::Float32, i64::from(value.to_bits()))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::slot(key, FieldKind::Bool, i64::from(value))
    }

    /// Duration in nanoseconds, saturating at `i64::MAX`.
    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        let nanos = i64::try_from(value.as_nanos()).unwrap_or(i64::MAX);
        Self::slot(key, FieldKind::Duration, nanos)
    }

    /// Timestamp rendered in UTC.
    pub fn time<Tz: TimeZone>(key: impl Into<String>, value: DateTime<Tz>) -> Self {
        Self::slot(key, FieldKind::Time, epoch_nanos(&value))
    }

    /// Timestamp rendered in its own offset.
    pub fn time_in_zone(key: impl Into<String>, value: DateTime<FixedOffset>) -> Self {
        Self {
            key: key.into(),
            kind: FieldKind::Time,
            integer: epoch_nanos(&value),
            payload: Payload::Zone(*value.offset()),
        }
    }

    pub fn binary(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = value.into();
        Self::with_payload(key, FieldKind::Binary, Payload::Bytes(bytes.into()))
    }

    /// UTF-8 text held as raw bytes.
    pub fn byte_string(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = value.into();
        Self::with_payload(key, FieldKind::ByteString, Payload::Bytes(bytes.into()))
    }

    pub fn complex64(key: impl Into<String>, re: f32, im: f32) -> Self {
        Self::with_payload(
            key,
            FieldKind::Complex64,
            Payload::Complex64(Complex::new(re, im)),
        )
    }

    pub fn complex128(key: impl Into<String>, re: f64, im: f64) -> Self {
        Self::with_payload(
            key,
            FieldKind::Complex128,
            Payload::Complex128(Complex::new(re, im)),
        )
    }

    /// The entry's error, stored under [`ERROR_KEY`].
    pub fn error<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::logged(LoggedError::exception(err))
    }

    /// An already wrapped error (e.g. a recovered panic), stored under [`ERROR_KEY`].
    pub fn logged(err: LoggedError) -> Self {
        Self::named_error(ERROR_KEY, err)
    }

    pub fn named_error(key: impl Into<String>, err: LoggedError) -> Self {
        Self::with_payload(key, FieldKind::Error, Payload::Error(err))
    }

    /// Any `Display` value, rendered lazily at decode time.
    pub fn stringer<T>(key: impl Into<String>, value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self::with_payload(key, FieldKind::Stringer, Payload::Stringer(Arc::new(value)))
    }

    /// A report tag: the key gets the [`TAG_PREFIX`].
    pub fn tag(name: &str, value: impl Into<String>) -> Self {
        Self::string(format!("{TAG_PREFIX}{name}"), value)
    }

    /// Placeholder that carries no value.
    pub fn skip() -> Self {
        Self::slot("", FieldKind::Skip, 0)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn integer(&self) -> i64 {
        self.integer
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Tag name if the key carries the tag prefix.
    pub fn tag_name(&self) -> Option<&str> {
        self.key.strip_prefix(TAG_PREFIX)
    }

    /// The stored error, if this is an Error-kind field.
    pub fn as_error(&self) -> Option<&LoggedError> {
        match (&self.kind, &self.payload) {
            (FieldKind::Error, Payload::Error(err)) => Some(err),
            _ => None,
        }
    }
}

/// Copy `parent` into fresh storage and append `extra`.
///
/// Each derivation owns its storage, so derivations from a shared parent
/// never observe one another.
pub fn append_fields<I>(parent: &[Field], extra: I) -> Arc<[Field]>
where
    I: IntoIterator<Item = Field>,
{
    let extra = extra.into_iter();
    let mut fields = Vec::with_capacity(parent.len() + extra.size_hint().0);
    fields.extend_from_slice(parent);
    fields.extend(extra);
    fields.into()
}

fn epoch_nanos<Tz: TimeZone>(value: &DateTime<Tz>) -> i64 {
    value
        .timestamp_nanos_opt()
        .unwrap_or_else(|| value.timestamp().saturating_mul(1_000_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_field_key() {
        let field = Field::tag("region", "eu");
        assert_eq!(field.key(), "tag.region");
        assert_eq!(field.tag_name(), Some("region"));
        assert_eq!(Field::string("region", "eu").tag_name(), None);
    }

    #[test]
    fn test_error_field_uses_reserved_key() {
        let field = Field::error(std::io::Error::other("disk full"));
        assert_eq!(field.key(), ERROR_KEY);
        assert_eq!(field.kind(), FieldKind::Error);
        assert_eq!(field.as_error().unwrap().to_string(), "disk full");
    }

    #[test]
    fn test_duration_saturates() {
        let field = Field::duration("wait", Duration::from_secs(u64::MAX));
        assert_eq!(field.integer(), i64::MAX);
    }

    #[test]
    fn test_append_fields_keeps_parent() {
        let parent = append_fields(&[], [Field::string("a", "1")]);
        let child = append_fields(&parent, [Field::string("b", "2")]);
        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
        assert_eq!(child[0].key(), "a");
        assert_eq!(child[1].key(), "b");
    }

    #[test]
    fn test_from_parts_rejects_unknown_kind() {
        let result = Field::from_parts("x", 99, 0, Payload::None);
        assert!(matches!(result, Err(DecodeError::UnknownFieldKind(99))));
    }
}
