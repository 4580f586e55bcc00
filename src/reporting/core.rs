//! Remote reporting core: gating, scope construction, and level routing.
//!
//! # Routing
//! ```text
//! Error          → error field is a recovered panic? recover (scope Fatal)
//!                                               else capture_exception
//! Panic, DPanic  → recover
//! Info/Warn/Debug→ capture_message
//! Fatal          → UnsupportedLevelError
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::field::{append_fields, Field, LoggedError, ERROR_KEY};
use crate::logger::{Entry, Level};
use crate::observability::metrics;
use crate::reporting::client::ReportingClient;
use crate::reporting::scope::Scope;
use crate::reporting::types::{FlushError, Hint, ReportLevel, UnsupportedLevelError};
use crate::sink::{Sink, SinkError};

/// Lower bound applied to every flush.
pub const MIN_FLUSH_TIMEOUT: Duration = Duration::from_secs(3);

/// Static tag carrying the service identity.
pub const SERVICE_TAG: &str = "service";

/// Construction options for [`RemoteReportingCore`].
#[derive(Debug, Clone)]
pub struct ReportingOptions {
    /// Service identity, added as the `service` tag when non-empty.
    pub service: String,
    pub min_level: Level,
    pub flush_timeout: Duration,
    pub tags: BTreeMap<String, String>,
    pub fields: Vec<Field>,
}

impl Default for ReportingOptions {
    fn default() -> Self {
        Self {
            service: String::new(),
            min_level: Level::Error,
            flush_timeout: MIN_FLUSH_TIMEOUT,
            tags: BTreeMap::new(),
            fields: Vec::new(),
        }
    }
}

/// Sink forwarding entries to an error-tracking service.
#[derive(Debug, Clone)]
pub struct RemoteReportingCore {
    min_level: Level,
    flush_timeout: Duration,
    tags: BTreeMap<String, String>,
    fields: Arc<[Field]>,
    client: Arc<dyn ReportingClient>,
}

impl RemoteReportingCore {
    pub fn new(options: ReportingOptions, client: Arc<dyn ReportingClient>) -> Self {
        let mut tags = options.tags;
        if !options.service.is_empty() {
            tags.insert(SERVICE_TAG.to_string(), options.service);
        }
        Self {
            min_level: options.min_level,
            flush_timeout: options.flush_timeout.max(MIN_FLUSH_TIMEOUT),
            tags,
            fields: options.fields.into(),
            client,
        }
    }

    /// Effective flush timeout (never below [`MIN_FLUSH_TIMEOUT`]).
    pub fn flush_timeout(&self) -> Duration {
        self.flush_timeout
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Clone with extra context fields.
    pub fn derive(&self, fields: &[Field]) -> Self {
        Self {
            min_level: self.min_level,
            flush_timeout: self.flush_timeout,
            tags: self.tags.clone(),
            fields: append_fields(&self.fields, fields.iter().cloned()),
            client: Arc::clone(&self.client),
        }
    }

    /// Build the report scope for `entry`.
    pub fn scope(&self, entry: &Entry) -> Result<Scope, SinkError> {
        Ok(Scope::build(entry, &self.tags, &self.fields)?)
    }

    /// Error carried by the entry, or one synthesized from its message.
    fn error_of(&self, entry: &Entry) -> LoggedError {
        entry
            .fields()
            .iter()
            .chain(self.fields.iter())
            .filter(|f| f.key() == ERROR_KEY)
            .find_map(Field::as_error)
            .cloned()
            .unwrap_or_else(|| LoggedError::from_message(entry.message()))
    }
}

impl Sink for RemoteReportingCore {
    fn enabled(&self, level: Level) -> bool {
        self.min_level <= level
    }

    fn write(&self, entry: &Entry) -> Result<(), SinkError> {
        let mut scope = self.scope(entry)?;

        let event_id = match entry.level() {
            Level::Error => {
                let err = self.error_of(entry);
                if err.is_recovered_panic() {
                    scope.level = ReportLevel::Fatal;
                    metrics::record_report("panic");
                    self.client.recover(&err, &Hint::recovered(&err), &scope)
                } else {
                    metrics::record_report("exception");
                    self.client
                        .capture_exception(&err, &Hint::exception(entry.message(), &err), &scope)
                }
            }
            Level::Panic | Level::DPanic => {
                let err = self.error_of(entry);
                metrics::record_report("panic");
                self.client.recover(&err, &Hint::recovered(&err), &scope)
            }
            // TODO: revisit whether info/warn/debug belong in the error tracker at all
            Level::Info | Level::Warn | Level::Debug => {
                metrics::record_report("message");
                self.client
                    .capture_message(entry.message(), &Hint::none(), &scope)
            }
            Level::Fatal => return Err(UnsupportedLevelError(entry.level()).into()),
        };

        if event_id.is_none() {
            tracing::debug!(level = %entry.level(), "Report was not accepted by the client");
        }
        Ok(())
    }

    fn with(&self, fields: &[Field]) -> Arc<dyn Sink> {
        Arc::new(self.derive(fields))
    }

    fn sync(&self) -> Result<(), SinkError> {
        if self.client.flush(self.flush_timeout) {
            metrics::record_flush(true);
            Ok(())
        } else {
            metrics::record_flush(false);
            Err(FlushError {
                timeout: self.flush_timeout,
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, FieldValue, Payload};
    use crate::reporting::recording::{Capture, RecordingClient};
    use crate::reporting::types::ScopeBuildError;

    fn core_with(client: &Arc<RecordingClient>, min_level: Level) -> RemoteReportingCore {
        RemoteReportingCore::new(
            ReportingOptions {
                service: "profile".to_string(),
                min_level,
                flush_timeout: Duration::from_secs(1),
                tags: BTreeMap::new(),
                fields: Vec::new(),
            },
            client.clone(),
        )
    }

    #[test]
    fn test_enabled_gate() {
        let client = Arc::new(RecordingClient::new());
        let core = core_with(&client, Level::Warn);
        assert!(!core.enabled(Level::Debug));
        assert!(!core.enabled(Level::Info));
        assert!(core.enabled(Level::Warn));
        assert!(core.enabled(Level::Panic));
    }

    #[test]
    fn test_low_levels_capture_message_once() {
        for level in [Level::Debug, Level::Info, Level::Warn] {
            let client = Arc::new(RecordingClient::new());
            let core = core_with(&client, Level::Debug);
            core.write(&Entry::new(level, "heads up", vec![])).unwrap();

            let captures = client.captures();
            assert_eq!(captures.len(), 1);
            match &captures[0] {
                Capture::Message { message, scope } => {
                    assert_eq!(message, "heads up");
                    assert_eq!(scope.level, ReportLevel::from(level));
                }
                other => panic!("unexpected capture {other:?}"),
            }
        }
    }

    #[test]
    fn test_error_captures_exact_exception() {
        let client = Arc::new(RecordingClient::new());
        let core = core_with(&client, Level::Error);
        let err = LoggedError::from_message("db failed");

        core.write(&Entry::new(Level::Error, "query", vec![Field::logged(err.clone())]))
            .unwrap();

        let captures = client.captures();
        assert_eq!(captures.len(), 1);
        match &captures[0] {
            Capture::Exception { error, hint, scope } => {
                assert!(error.ptr_eq(&err));
                assert_eq!(hint.data.as_deref(), Some("query"));
                assert_eq!(scope.level, ReportLevel::Error);
            }
            other => panic!("unexpected capture {other:?}"),
        }
    }

    #[test]
    fn test_error_with_recovered_panic_goes_to_recover() {
        let client = Arc::new(RecordingClient::new());
        let core = core_with(&client, Level::Error);
        let err = LoggedError::from_panic_payload(Box::new("index out of bounds"));

        core.write(&Entry::new(Level::Error, "handler panicked", vec![Field::logged(err.clone())]))
            .unwrap();

        let captures = client.captures();
        assert_eq!(captures.len(), 1);
        match &captures[0] {
            Capture::Recover { error, scope, .. } => {
                assert!(error.ptr_eq(&err));
                assert_eq!(scope.level, ReportLevel::Fatal);
            }
            other => panic!("unexpected capture {other:?}"),
        }
    }

    #[test]
    fn test_missing_error_synthesized_from_message() {
        let client = Arc::new(RecordingClient::new());
        let core = core_with(&client, Level::Error);
        core.write(&Entry::new(Level::Panic, "invariant broken", vec![]))
            .unwrap();

        match &client.captures()[0] {
            Capture::Recover { error, scope, .. } => {
                assert_eq!(error.to_string(), "invariant broken");
                assert_eq!(scope.level, ReportLevel::Fatal);
            }
            other => panic!("unexpected capture {other:?}"),
        }
    }

    #[test]
    fn test_fatal_is_unsupported() {
        let client = Arc::new(RecordingClient::new());
        let core = core_with(&client, Level::Error);
        let err = core
            .write(&Entry::new(Level::Fatal, "going down", vec![]))
            .unwrap_err();
        assert!(matches!(err, SinkError::UnsupportedLevel(UnsupportedLevelError(Level::Fatal))));
        assert!(client.captures().is_empty());
    }

    #[test]
    fn test_with_copies_context_without_touching_parent() {
        let client = Arc::new(RecordingClient::new());
        let parent = core_with(&client, Level::Debug);
        let child = parent.derive(&[Field::string("request_id", "r-1")]);
        let grandchild = child.derive(&[Field::tag("region", "eu")]);

        assert!(parent.fields().is_empty());
        assert_eq!(child.fields().len(), 1);
        assert_eq!(grandchild.fields().len(), 2);
        assert_eq!(grandchild.flush_timeout(), MIN_FLUSH_TIMEOUT);

        grandchild.write(&Entry::new(Level::Info, "hi", vec![])).unwrap();
        match &client.captures()[0] {
            Capture::Message { scope, .. } => {
                assert_eq!(scope.tags["region"], "eu");
                assert_eq!(scope.tags["service"], "profile");
                assert!(matches!(scope.extras["request_id"], FieldValue::Str(ref s) if s == "r-1"));
            }
            other => panic!("unexpected capture {other:?}"),
        }
    }

    #[test]
    fn test_service_identity_becomes_static_tag() {
        let client = Arc::new(RecordingClient::new());
        let mut tags = BTreeMap::new();
        tags.insert("team".to_string(), "identity".to_string());
        tags.insert("service".to_string(), "stale".to_string());
        let core = RemoteReportingCore::new(
            ReportingOptions {
                service: "billing".to_string(),
                tags,
                ..ReportingOptions::default()
            },
            client.clone(),
        );
        assert_eq!(core.tags()["service"], "billing");
        assert_eq!(core.tags()["team"], "identity");
        assert_eq!(core.derive(&[]).tags()["service"], "billing");

        let anonymous = RemoteReportingCore::new(ReportingOptions::default(), client);
        assert!(anonymous.tags().is_empty());
    }

    #[test]
    fn test_undecodable_field_fails_write_without_capture() {
        let client = Arc::new(RecordingClient::new());
        let core = core_with(&client, Level::Debug);
        let broken =
            Field::from_parts("attempt", FieldKind::String.code(), 0, Payload::None).unwrap();

        let err = core
            .write(&Entry::new(Level::Error, "query", vec![broken]))
            .unwrap_err();
        assert!(matches!(
            err,
            SinkError::ScopeBuild(ScopeBuildError::Decode { ref key, .. }) if key == "attempt"
        ));
        assert!(client.captures().is_empty());
    }

    #[test]
    fn test_sync_uses_timeout_floor() {
        let client = Arc::new(RecordingClient::new());
        let core = core_with(&client, Level::Error);
        core.sync().unwrap();
        assert_eq!(client.flush_timeouts(), vec![Duration::from_secs(3)]);

        client.set_flush_result(false);
        let err = core.sync().unwrap_err();
        assert!(matches!(err, SinkError::Flush(FlushError { timeout }) if timeout == MIN_FLUSH_TIMEOUT));
    }

    #[test]
    fn test_longer_flush_timeout_kept() {
        let client = Arc::new(RecordingClient::new());
        let core = RemoteReportingCore::new(
            ReportingOptions {
                flush_timeout: Duration::from_secs(10),
                ..ReportingOptions::default()
            },
            client.clone(),
        );
        core.sync().unwrap();
        assert_eq!(client.flush_timeouts(), vec![Duration::from_secs(10)]);
    }
}
