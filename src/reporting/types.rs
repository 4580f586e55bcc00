//! Reporting types and error definitions.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

use crate::field::{DecodeError, LoggedError};
use crate::logger::Level;

/// Errors raised while building a report scope.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScopeBuildError {
    /// A field could not be decoded.
    #[error("failed to decode field `{key}`: {source}")]
    Decode {
        key: String,
        #[source]
        source: DecodeError,
    },
}

/// The entry level has no dispatch route.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("unsupported level: {0}")]
pub struct UnsupportedLevelError(pub Level);

/// The reporting client did not deliver everything before the deadline.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("flush did not complete within {}ms", .timeout.as_millis())]
pub struct FlushError {
    pub timeout: Duration,
}

/// Severity as understood by the error-tracking service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl ReportLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportLevel::Debug => "debug",
            ReportLevel::Info => "info",
            ReportLevel::Warning => "warning",
            ReportLevel::Error => "error",
            ReportLevel::Fatal => "fatal",
        }
    }
}

impl From<Level> for ReportLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Debug => ReportLevel::Debug,
            Level::Info => ReportLevel::Info,
            Level::Warn => ReportLevel::Warning,
            Level::Error => ReportLevel::Error,
            Level::DPanic | Level::Panic | Level::Fatal => ReportLevel::Fatal,
        }
    }
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier assigned to an accepted report; rendered as 32 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl Serialize for EventId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Extra context passed alongside a capture call.
#[derive(Debug, Clone, Default)]
pub struct Hint {
    /// Free-form data, usually the log message.
    pub data: Option<String>,
    /// The error as originally logged.
    pub original: Option<LoggedError>,
    /// Set when the error came out of a recovered panic.
    pub recovered: Option<LoggedError>,
}

impl Hint {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn exception(message: &str, err: &LoggedError) -> Self {
        Self {
            data: Some(message.to_string()),
            original: Some(err.clone()),
            recovered: None,
        }
    }

    pub fn recovered(err: &LoggedError) -> Self {
        Self {
            data: None,
            original: None,
            recovered: Some(err.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(ReportLevel::from(Level::Debug), ReportLevel::Debug);
        assert_eq!(ReportLevel::from(Level::Info), ReportLevel::Info);
        assert_eq!(ReportLevel::from(Level::Warn), ReportLevel::Warning);
        assert_eq!(ReportLevel::from(Level::Error), ReportLevel::Error);
        assert_eq!(ReportLevel::from(Level::DPanic), ReportLevel::Fatal);
        assert_eq!(ReportLevel::from(Level::Panic), ReportLevel::Fatal);
        assert_eq!(ReportLevel::from(Level::Fatal), ReportLevel::Fatal);
    }

    #[test]
    fn test_event_id_format() {
        let id = EventId::new();
        let rendered = id.to_string();
        assert_eq!(rendered.len(), 32);
        assert!(!rendered.contains('-'));
    }

    #[test]
    fn test_flush_error_message() {
        let err = FlushError {
            timeout: Duration::from_secs(3),
        };
        assert_eq!(err.to_string(), "flush did not complete within 3000ms");
    }
}
