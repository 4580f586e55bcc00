//! Remote-reporting client capability.

use std::fmt;
use std::time::Duration;

use crate::field::LoggedError;
use crate::reporting::scope::Scope;
use crate::reporting::types::{EventId, Hint};

/// Operations the reporting core needs from an error-tracking service.
///
/// Capture calls return the id of the accepted event, or `None` when the
/// event was dropped. Delivery itself may happen asynchronously; `flush`
/// waits for it.
pub trait ReportingClient: Send + Sync + fmt::Debug {
    /// Wait until queued events are delivered. Returns true if nothing is left.
    fn flush(&self, timeout: Duration) -> bool;

    /// Report an error that came out of a recovered panic.
    fn recover(&self, error: &LoggedError, hint: &Hint, scope: &Scope) -> Option<EventId>;

    /// Report an ordinary error.
    fn capture_exception(&self, error: &LoggedError, hint: &Hint, scope: &Scope) -> Option<EventId>;

    /// Report a plain message.
    fn capture_message(&self, message: &str, hint: &Hint, scope: &Scope) -> Option<EventId>;
}
