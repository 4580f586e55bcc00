//! Field kind enumeration.

use std::fmt;

use crate::field::value::DecodeError;

/// Type tag of a [`Field`](crate::field::Field).
///
/// Each kind has a stable numeric code so fields can be rebuilt from raw
/// parts; any code outside this set is rejected.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String = 1,
    Int64 = 2,
    Int32 = 3,
    Int16 = 4,
    Int8 = 5,
    Uint64 = 6,
    Uint32 = 7,
    Uint16 = 8,
    Uint8 = 9,
    Float64 = 10,
    Float32 = 11,
    Bool = 12,
    Duration = 13,
    Time = 14,
    Binary = 15,
    ByteString = 16,
    Complex64 = 17,
    Complex128 = 18,
    Error = 19,
    Stringer = 20,
    Skip = 21,
}

impl FieldKind {
    /// Numeric code of this kind.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Resolve a numeric code back into a kind.
    pub fn from_code(code: u8) -> Result<Self, DecodeError> {
        let kind = match code {
            1 => FieldKind::String,
            2 => FieldKind::Int64,
            3 => FieldKind::Int32,
            4 => FieldKind::Int16,
            5 => FieldKind::Int8,
            6 => FieldKind::Uint64,
            7 => FieldKind::Uint32,
            8 => FieldKind::Uint16,
            9 => FieldKind::Uint8,
            10 => FieldKind::Float64,
            11 => FieldKind::Float32,
            12 => FieldKind::Bool,
            13 => FieldKind::Duration,
            14 => FieldKind::Time,
            15 => FieldKind::Binary,
            16 => FieldKind::ByteString,
            17 => FieldKind::Complex64,
            18 => FieldKind::Complex128,
            19 => FieldKind::Error,
            20 => FieldKind::Stringer,
            21 => FieldKind::Skip,
            other => return Err(DecodeError::UnknownFieldKind(other)),
        };
        Ok(kind)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Int64 => "int64",
            FieldKind::Int32 => "int32",
            FieldKind::Int16 => "int16",
            FieldKind::Int8 => "int8",
            FieldKind::Uint64 => "uint64",
            FieldKind::Uint32 => "uint32",
            FieldKind::Uint16 => "uint16",
            FieldKind::Uint8 => "uint8",
            FieldKind::Float64 => "float64",
            FieldKind::Float32 => "float32",
            FieldKind::Bool => "bool",
            FieldKind::Duration => "duration",
            FieldKind::Time => "time",
            FieldKind::Binary => "binary",
            FieldKind::ByteString => "bytestring",
            FieldKind::Complex64 => "complex64",
            FieldKind::Complex128 => "complex128",
            FieldKind::Error => "error",
            FieldKind::Stringer => "stringer",
            FieldKind::Skip => "skip",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
