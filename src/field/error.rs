//! Errors carried inside log fields.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Origin of a [`LoggedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An expected error condition returned by application code.
    Exception,
    /// A panic caught at a recovery boundary.
    RecoveredPanic,
}

/// Error value stored in an Error-kind field.
///
/// Cloning shares the underlying error, so the value handed to a reporting
/// client is the same allocation the caller logged.
#[derive(Clone)]
pub struct LoggedError {
    kind: ErrorKind,
    inner: Arc<dyn StdError + Send + Sync + 'static>,
}

impl LoggedError {
    /// Wrap an ordinary error.
    pub fn exception<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            kind: ErrorKind::Exception,
            inner: Arc::new(err),
        }
    }

    /// Wrap an error that originated from a recovered panic.
    pub fn recovered_panic<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            kind: ErrorKind::RecoveredPanic,
            inner: Arc::new(err),
        }
    }

    /// Build a recovered-panic error from a `catch_unwind` payload.
    pub fn from_panic_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic with non-string payload".to_string()
        };
        Self::recovered_panic(MessageError::new(message))
    }

    /// Synthesize an exception from a plain message.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self::exception(MessageError::new(message))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_recovered_panic(&self) -> bool {
        self.kind == ErrorKind::RecoveredPanic
    }

    /// The wrapped error.
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.inner.as_ref()
    }

    /// True if both values share the same underlying error.
    pub fn ptr_eq(&self, other: &LoggedError) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for LoggedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggedError")
            .field("kind", &self.kind)
            .field("error", &self.inner)
            .finish()
    }
}

impl fmt::Display for LoggedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for LoggedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

/// Error made of a message only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MessageError {
    message: String,
}

impl MessageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
