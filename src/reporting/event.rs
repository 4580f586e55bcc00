//! Outbound event envelope.
//!
//! One JSON object per report:
//! ```text
//! { event_id, timestamp, level, message?, exception[], tags{}, extra{},
//!   server_name, environment }
//! ```

use std::collections::BTreeMap;
use std::error::Error as StdError;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::field::{ErrorKind, FieldValue, LoggedError};
use crate::reporting::scope::Scope;
use crate::reporting::types::{EventId, Hint, ReportLevel};

/// Identity of the reporting process.
#[derive(Debug, Clone, Default)]
pub struct Origin {
    pub server_name: String,
    pub environment: String,
}

/// How an exception reached the reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mechanism {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub handled: bool,
}

impl Mechanism {
    /// Error handed to the reporter by application code.
    pub fn generic() -> Self {
        Self {
            kind: "generic",
            handled: true,
        }
    }

    /// Error recovered from a panic.
    pub fn panic() -> Self {
        Self {
            kind: "panic",
            handled: false,
        }
    }
}

/// One error in the exception chain, outermost first.
#[derive(Debug, Clone, Serialize)]
pub struct ExceptionInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub mechanism: Mechanism,
}

/// Event posted to the error-tracking endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEvent {
    pub event_id: EventId,
    pub timestamp: DateTime<Utc>,
    pub level: ReportLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exception: Vec<ExceptionInfo>,
    pub tags: BTreeMap<String, String>,
    pub extra: BTreeMap<String, FieldValue>,
    pub server_name: String,
    pub environment: String,
}

impl ReportEvent {
    fn base(scope: &Scope, origin: &Origin) -> Self {
        Self {
            event_id: EventId::new(),
            timestamp: Utc::now(),
            level: scope.level,
            message: None,
            exception: Vec::new(),
            tags: scope.tags.clone(),
            extra: scope.extras.clone(),
            server_name: origin.server_name.clone(),
            environment: origin.environment.clone(),
        }
    }

    /// Event for a captured or recovered error.
    pub fn exception(
        error: &LoggedError,
        mechanism: Mechanism,
        hint: &Hint,
        scope: &Scope,
        origin: &Origin,
    ) -> Self {
        let mut chain = vec![ExceptionInfo {
            kind: kind_name(error.kind()).to_string(),
            value: error.to_string(),
            mechanism: mechanism.clone(),
        }];
        let mut source = error.inner().source();
        while let Some(cause) = source {
            chain.push(ExceptionInfo {
                kind: "Cause".to_string(),
                value: cause.to_string(),
                mechanism: mechanism.clone(),
            });
            source = cause.source();
        }

        Self {
            message: hint.data.clone(),
            exception: chain,
            ..Self::base(scope, origin)
        }
    }

    /// Event for a plain message.
    pub fn message(text: &str, scope: &Scope, origin: &Origin) -> Self {
        Self {
            message: Some(text.to_string()),
            ..Self::base(scope, origin)
        }
    }
}

fn kind_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Exception => "Exception",
        ErrorKind::RecoveredPanic => "RecoveredPanic",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::logger::{Entry, Level};
    use std::fmt;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("query failed")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    fn scope_for(level: Level) -> Scope {
        let entry = Entry::new(level, "m", vec![Field::string("user_id", "42")]);
        Scope::build(&entry, &BTreeMap::new(), &[]).unwrap()
    }

    fn origin() -> Origin {
        Origin {
            server_name: "profile".into(),
            environment: "production".into(),
        }
    }

    #[test]
    fn test_exception_chain_and_json_shape() {
        let err = LoggedError::exception(Outer(std::io::Error::other("connection reset")));
        let event = ReportEvent::exception(
            &err,
            Mechanism::generic(),
            &Hint::exception("db failed", &err),
            &scope_for(Level::Error),
            &origin(),
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["message"], "db failed");
        assert_eq!(json["server_name"], "profile");
        assert_eq!(json["environment"], "production");
        assert_eq!(json["extra"]["user_id"], "42");
        assert_eq!(json["exception"][0]["type"], "Exception");
        assert_eq!(json["exception"][0]["value"], "query failed");
        assert_eq!(json["exception"][0]["mechanism"]["handled"], true);
        assert_eq!(json["exception"][1]["value"], "connection reset");
        assert_eq!(json["event_id"].as_str().unwrap().len(), 32);
    }

    #[test]
    fn test_panic_mechanism_unhandled() {
        let err = LoggedError::from_panic_payload(Box::new("boom"));
        let event = ReportEvent::exception(
            &err,
            Mechanism::panic(),
            &Hint::recovered(&err),
            &scope_for(Level::Panic),
            &origin(),
        );
        assert_eq!(event.exception.len(), 1);
        assert_eq!(event.exception[0].kind, "RecoveredPanic");
        assert_eq!(event.exception[0].mechanism, Mechanism::panic());
        assert!(event.message.is_none());
    }

    #[test]
    fn test_message_event_has_no_exception() {
        let event = ReportEvent::message("cache warm", &scope_for(Level::Info), &origin());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["message"], "cache warm");
        assert_eq!(json["level"], "info");
        assert!(json.get("exception").is_none());
    }
}
