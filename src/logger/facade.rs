//! Logger handle with immutable context.

use std::fmt;
use std::panic::{self, UnwindSafe};
use std::sync::Arc;

use crate::field::{append_fields, loose_fields, Field, LoggedError, LooseValue};
use crate::logger::entry::Entry;
use crate::logger::level::Level;
use crate::observability::metrics;
use crate::sink::{Sink, SinkError};

/// Cheap-to-clone logging handle.
///
/// Every entry carries the call-site fields first, then the context fields
/// accumulated through [`Logger::add_field`] and [`Logger::with`].
#[derive(Clone)]
pub struct Logger {
    context: Arc<[Field]>,
    sinks: Arc<[Arc<dyn Sink>]>,
}

impl Logger {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self {
            context: Arc::from(Vec::new()),
            sinks: sinks.into(),
        }
    }

    /// Logger without sinks; every entry is discarded.
    pub fn nop() -> Self {
        Self::new(Vec::new())
    }

    pub fn context(&self) -> &[Field] {
        &self.context
    }

    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        &self.sinks
    }

    /// Derive a logger with one more string context field.
    pub fn add_field(&self, name: impl Into<String>, value: impl Into<String>) -> Logger {
        self.with([Field::string(name, value)])
    }

    /// Derive a logger with extra context fields.
    pub fn with<I>(&self, fields: I) -> Logger
    where
        I: IntoIterator<Item = Field>,
    {
        Logger {
            context: append_fields(&self.context, fields),
            sinks: Arc::clone(&self.sinks),
        }
    }

    pub fn debug<I>(&self, message: &str, fields: I)
    where
        I: IntoIterator<Item = Field>,
    {
        self.log(Level::Debug, message, fields);
    }

    pub fn info<I>(&self, message: &str, fields: I)
    where
        I: IntoIterator<Item = Field>,
    {
        self.log(Level::Info, message, fields);
    }

    pub fn warn<I>(&self, message: &str, fields: I)
    where
        I: IntoIterator<Item = Field>,
    {
        self.log(Level::Warn, message, fields);
    }

    pub fn error<I>(&self, message: &str, fields: I)
    where
        I: IntoIterator<Item = Field>,
    {
        self.log(Level::Error, message, fields);
    }

    /// Log at any level. Panic and Fatal entries are recorded only; the
    /// logger neither unwinds nor exits.
    pub fn log<I>(&self, level: Level, message: &str, fields: I)
    where
        I: IntoIterator<Item = Field>,
    {
        if !self.enabled(level) {
            return;
        }

        let mut all: Vec<Field> = fields.into_iter().collect();
        all.extend_from_slice(&self.context);
        let entry = Entry::new(level, message, all);
        metrics::record_entry(level);

        for sink in self.sinks.iter().filter(|sink| sink.enabled(level)) {
            if let Err(e) = sink.write(&entry) {
                metrics::record_sink_failure("write");
                tracing::warn!(
                    sink = ?sink,
                    level = %level,
                    error = %e,
                    "Sink rejected log entry"
                );
            }
        }
    }

    /// Log a formatted message with no call-site fields.
    ///
    /// Formatting is skipped when no sink accepts `level`.
    pub fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        match args.as_str() {
            Some(message) => self.log(level, message, []),
            None => self.log(level, &args.to_string(), []),
        }
    }

    pub fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Debug, args);
    }

    pub fn info_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Info, args);
    }

    pub fn warn_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Warn, args);
    }

    pub fn error_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Error, args);
    }

    /// Log with loosely typed key/values, as handed over by callback-style
    /// logging interfaces. Values that are not fields are keyed `unknown`.
    pub fn log_kv<I>(&self, level: Level, message: &str, values: I)
    where
        I: IntoIterator,
        I::Item: Into<LooseValue>,
    {
        if self.enabled(level) {
            self.log(level, message, loose_fields(values));
        }
    }

    /// Whether any attached sink accepts `level`.
    pub fn enabled(&self, level: Level) -> bool {
        self.sinks.iter().any(|sink| sink.enabled(level))
    }

    /// Run `f`, logging and returning a recovered panic as an error.
    pub fn catch_panic<F, T>(&self, message: &str, f: F) -> Result<T, LoggedError>
    where
        F: FnOnce() -> T + UnwindSafe,
    {
        panic::catch_unwind(f).map_err(|payload| {
            let err = LoggedError::from_panic_payload(payload);
            self.error(message, [Field::logged(err.clone())]);
            err
        })
    }

    /// Flush every sink. All failures are logged; the first is returned.
    pub fn sync(&self) -> Result<(), SinkError> {
        let mut first = None;
        for sink in self.sinks.iter() {
            if let Err(e) = sink.sync() {
                metrics::record_sink_failure("sync");
                tracing::warn!(sink = ?sink, error = %e, "Sink sync failed");
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::nop()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("context", &self.context.len())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
