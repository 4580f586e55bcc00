//! Console sink backed by `tracing`.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::field::{append_fields, decode, Field};
use crate::logger::{Entry, Level};
use crate::observability::metrics;
use crate::sink::types::{Sink, SinkError};

const TARGET: &str = "profile_log";

/// Writes entries as `tracing` events; the installed subscriber decides the
/// output format (pretty or JSON).
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    min_level: Level,
    fields: Arc<[Field]>,
}

impl ConsoleSink {
    pub fn new(min_level: Level) -> Self {
        Self {
            min_level,
            fields: Arc::from(Vec::new()),
        }
    }

    /// Entry fields followed by this sink's context, Skip fields dropped.
    fn render(&self, entry: &Entry) -> Result<Value, SinkError> {
        let mut map = Map::new();
        for field in entry.fields().iter().chain(self.fields.iter()) {
            if let Some(value) = decode(field)? {
                let json = serde_json::to_value(&value)
                    .unwrap_or_else(|_| Value::String(value.to_string()));
                map.entry(field.key()).or_insert(json);
            }
        }
        Ok(Value::Object(map))
    }
}

impl Sink for ConsoleSink {
    fn enabled(&self, level: Level) -> bool {
        self.min_level <= level
    }

    fn write(&self, entry: &Entry) -> Result<(), SinkError> {
        let fields = self.render(entry)?;
        let message = entry.message();
        match entry.level() {
            Level::Debug => tracing::debug!(target: TARGET, fields = %fields, "{message}"),
            Level::Info => tracing::info!(target: TARGET, fields = %fields, "{message}"),
            Level::Warn => tracing::warn!(target: TARGET, fields = %fields, "{message}"),
            Level::Error | Level::DPanic | Level::Panic | Level::Fatal => tracing::error!(
                target: TARGET,
                severity = entry.level().as_str(),
                fields = %fields,
                "{message}"
            ),
        }
        metrics::record_console_write(entry.level());
        Ok(())
    }

    fn with(&self, fields: &[Field]) -> Arc<dyn Sink> {
        Arc::new(Self {
            min_level: self.min_level,
            fields: append_fields(&self.fields, fields.iter().cloned()),
        })
    }

    fn sync(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
