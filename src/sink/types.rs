//! Sink capability and its error type.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::field::{DecodeError, Field};
use crate::logger::{Entry, Level};
use crate::reporting::types::{FlushError, ScopeBuildError, UnsupportedLevelError};

/// Errors a sink can return from `write` or `sync`.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    ScopeBuild(#[from] ScopeBuildError),

    #[error(transparent)]
    UnsupportedLevel(#[from] UnsupportedLevelError),

    #[error(transparent)]
    Flush(#[from] FlushError),
}

/// A fan-out target receiving every log entry.
///
/// Implementations are shared between loggers and threads; deriving new
/// context goes through [`Sink::with`] and never mutates `self`.
pub trait Sink: Send + Sync + fmt::Debug {
    /// Whether entries at `level` should be written.
    fn enabled(&self, level: Level) -> bool;

    /// Handle one entry.
    fn write(&self, entry: &Entry) -> Result<(), SinkError>;

    /// Derive a sink carrying additional context fields.
    fn with(&self, fields: &[Field]) -> Arc<dyn Sink>;

    /// Flush anything buffered. Called at shutdown.
    fn sync(&self) -> Result<(), SinkError>;
}
