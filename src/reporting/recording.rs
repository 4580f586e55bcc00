//! In-memory reporting client for tests and dry runs.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::field::LoggedError;
use crate::reporting::client::ReportingClient;
use crate::reporting::scope::Scope;
use crate::reporting::types::{EventId, Hint};

/// One recorded call.
#[derive(Debug, Clone)]
pub enum Capture {
    Recover {
        error: LoggedError,
        hint: Hint,
        scope: Scope,
    },
    Exception {
        error: LoggedError,
        hint: Hint,
        scope: Scope,
    },
    Message {
        message: String,
        scope: Scope,
    },
}

#[derive(Debug)]
struct State {
    captures: Vec<Capture>,
    flush_timeouts: Vec<Duration>,
    flush_result: bool,
}

/// Client that keeps every capture in memory.
#[derive(Debug)]
pub struct RecordingClient {
    state: Mutex<State>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                captures: Vec::new(),
                flush_timeouts: Vec::new(),
                flush_result: true,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of all captures so far.
    pub fn captures(&self) -> Vec<Capture> {
        self.lock().captures.clone()
    }

    /// Timeouts passed to every `flush` call.
    pub fn flush_timeouts(&self) -> Vec<Duration> {
        self.lock().flush_timeouts.clone()
    }

    /// Value returned by subsequent `flush` calls.
    pub fn set_flush_result(&self, delivered: bool) {
        self.lock().flush_result = delivered;
    }

    fn record(&self, capture: Capture) -> Option<EventId> {
        self.lock().captures.push(capture);
        Some(EventId::new())
    }
}

impl Default for RecordingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportingClient for RecordingClient {
    fn flush(&self, timeout: Duration) -> bool {
        let mut state = self.lock();
        state.flush_timeouts.push(timeout);
        state.flush_result
    }

    fn recover(&self, error: &LoggedError, hint: &Hint, scope: &Scope) -> Option<EventId> {
        self.record(Capture::Recover {
            error: error.clone(),
            hint: hint.clone(),
            scope: scope.clone(),
        })
    }

    fn capture_exception(&self, error: &LoggedError, hint: &Hint, scope: &Scope) -> Option<EventId> {
        self.record(Capture::Exception {
            error: error.clone(),
            hint: hint.clone(),
            scope: scope.clone(),
        })
    }

    fn capture_message(&self, message: &str, _hint: &Hint, scope: &Scope) -> Option<EventId> {
        self.record(Capture::Message {
            message: message.to_string(),
            scope: scope.clone(),
        })
    }
}
