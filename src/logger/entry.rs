//! A single log occurrence.

use chrono::{DateTime, Utc};

use crate::field::Field;
use crate::logger::level::Level;

/// Immutable log entry handed to every sink.
#[derive(Debug, Clone)]
pub struct Entry {
    level: Level,
    message: String,
    timestamp: DateTime<Utc>,
    fields: Vec<Field>,
}

impl Entry {
    /// Build an entry stamped with the current time.
    pub fn new(level: Level, message: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::at(level, message, Utc::now(), fields)
    }

    pub fn at(
        level: Level,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
        fields: Vec<Field>,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp,
            fields,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// First field with the given key.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key() == key)
    }
}
