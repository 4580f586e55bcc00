//! Loosely typed values for key/value logging adapters.

use crate::field::error::LoggedError;
use crate::field::typed::Field;

/// Key given to values that arrive without one.
pub const UNKNOWN_KEY: &str = "unknown";

/// A value handed to a key/value adapter: either a ready field or a bare
/// value that gets keyed as [`UNKNOWN_KEY`].
#[derive(Debug, Clone)]
pub enum LooseValue {
    Field(Field),
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Error(LoggedError),
}

impl LooseValue {
    pub fn into_field(self) -> Field {
        match self {
            LooseValue::Field(field) => field,
            LooseValue::Str(s) => Field::string(UNKNOWN_KEY, s),
            LooseValue::I64(v) => Field::i64(UNKNOWN_KEY, v),
            LooseValue::U64(v) => Field::u64(UNKNOWN_KEY, v),
            LooseValue::F64(v) => Field::f64(UNKNOWN_KEY, v),
            LooseValue::Bool(v) => Field::bool(UNKNOWN_KEY, v),
            LooseValue::Error(e) => Field::named_error(UNKNOWN_KEY, e),
        }
    }
}

impl From<Field> for LooseValue {
    fn from(field: Field) -> Self {
        LooseValue::Field(field)
    }
}

impl From<&str> for LooseValue {
    fn from(value: &str) -> Self {
        LooseValue::Str(value.to_string())
    }
}

impl From<String> for LooseValue {
    fn from(value: String) -> Self {
        LooseValue::Str(value)
    }
}

impl From<i64> for LooseValue {
    fn from(value: i64) -> Self {
        LooseValue::I64(value)
    }
}

impl From<i32> for LooseValue {
    fn from(value: i32) -> Self {
        LooseValue::I64(value.into())
    }
}

impl From<u64> for LooseValue {
    fn from(value: u64) -> Self {
        LooseValue::U64(value)
    }
}

impl From<f64> for LooseValue {
    fn from(value: f64) -> Self {
        LooseValue::F64(value)
    }
}

impl From<bool> for LooseValue {
    fn from(value: bool) -> Self {
        LooseValue::Bool(value)
    }
}

impl From<LoggedError> for LooseValue {
    fn from(value: LoggedError) -> Self {
        LooseValue::Error(value)
    }
}

/// Turn loose values into fields, in order.
pub fn loose_fields<I>(values: I) -> Vec<Field>
where
    I: IntoIterator,
    I::Item: Into<LooseValue>,
{
    values.into_iter().map(|v| v.into().into_field()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{decode, FieldKind, FieldValue};

    #[test]
    fn test_fields_pass_through_and_bare_values_get_unknown_key() {
        let fields = loose_fields([
            LooseValue::from(Field::string("workflow_id", "wf-1")),
            LooseValue::from("activity started"),
            LooseValue::from(3i64),
            LooseValue::from(true),
        ]);

        let keys: Vec<&str> = fields.iter().map(Field::key).collect();
        assert_eq!(keys, vec!["workflow_id", "unknown", "unknown", "unknown"]);
        assert!(matches!(decode(&fields[2]).unwrap(), Some(FieldValue::I64(3))));
        assert!(matches!(decode(&fields[3]).unwrap(), Some(FieldValue::Bool(true))));
    }

    #[test]
    fn test_bare_error_is_not_the_entry_error() {
        let fields = loose_fields([LoggedError::from_message("retry exhausted")]);
        assert_eq!(fields[0].key(), UNKNOWN_KEY);
        assert_eq!(fields[0].kind(), FieldKind::Error);
    }
}
