//! Report scope: tags, extras, and severity for one outbound event.
//!
//! # Partition Rules
//! - Tags: static tags, then every field keyed `tag.<name>` (empty names dropped)
//! - Extras: every other field except Skip, `_`-prefixed keys, and the `error` key
//! - Fields are visited call-site first, then context; later writes win

use std::collections::BTreeMap;

use crate::field::{decode, Field, FieldKind, FieldValue, ERROR_KEY};
use crate::logger::Entry;
use crate::reporting::types::{ReportLevel, ScopeBuildError};

/// Keys starting with this marker are internal and never reported.
pub const INTERNAL_PREFIX: &str = "_";

/// Bundle of tags, extras, and severity attached to one report.
#[derive(Debug, Clone)]
pub struct Scope {
    pub level: ReportLevel,
    pub tags: BTreeMap<String, String>,
    pub extras: BTreeMap<String, FieldValue>,
}

impl Scope {
    /// Build the scope of `entry`, with `context` fields visited after the
    /// entry's own fields.
    pub fn build(
        entry: &Entry,
        static_tags: &BTreeMap<String, String>,
        context: &[Field],
    ) -> Result<Self, ScopeBuildError> {
        let mut tags = static_tags.clone();
        let mut extras = BTreeMap::new();

        for field in entry.fields().iter().chain(context.iter()) {
            if field.kind() == FieldKind::Skip {
                continue;
            }

            if let Some(name) = field.tag_name() {
                if name.is_empty() {
                    continue;
                }
                if let Some(value) = decode_field(field)? {
                    tags.insert(name.to_string(), value.to_string());
                }
                continue;
            }

            if is_reserved(field.key()) {
                continue;
            }
            if let Some(value) = decode_field(field)? {
                extras.insert(field.key().to_string(), value);
            }
        }

        Ok(Self {
            level: ReportLevel::from(entry.level()),
            tags,
            extras,
        })
    }
}

fn is_reserved(key: &str) -> bool {
    key.starts_with(INTERNAL_PREFIX) || key.eq_ignore_ascii_case(ERROR_KEY)
}

fn decode_field(field: &Field) -> Result<Option<FieldValue>, ScopeBuildError> {
    decode(field).map_err(|source| ScopeBuildError::Decode {
        key: field.key().to_string(),
        source,
    })
}
