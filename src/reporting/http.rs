//! HTTP reporting client.
//!
//! # Responsibilities
//! - Turn capture calls into [`ReportEvent`]s and queue them
//! - Deliver queued events from a background worker
//! - Let `flush` wait for the queue to drain, bounded by a timeout
//!
//! # Design Decisions
//! - Capture calls never block: a full queue drops the event
//! - One worker thread with its own current-thread runtime, so the client
//!   works from both sync and async callers
//! - No retry; failed deliveries are logged and counted

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use url::Url;

use crate::field::LoggedError;
use crate::observability::metrics;
use crate::reporting::client::ReportingClient;
use crate::reporting::event::{Mechanism, Origin, ReportEvent};
use crate::reporting::scope::Scope;
use crate::reporting::types::{EventId, Hint};

/// Errors raised while starting the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("queue capacity must be greater than zero")]
    ZeroQueueCapacity,

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to start delivery worker: {0}")]
    Worker(#[source] std::io::Error),
}

#[derive(Debug, Error)]
enum DeliveryError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("collector returned status {0}")]
    Status(u16),
}

/// Settings for [`HttpReportingClient`].
#[derive(Debug, Clone)]
pub struct HttpClientSettings {
    pub endpoint: Url,
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
    pub queue_capacity: usize,
    pub origin: Origin,
}

/// Count of queued-but-undelivered events.
#[derive(Debug, Default)]
struct Pending {
    count: Mutex<usize>,
    drained: Condvar,
}

impl Pending {
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add(&self) {
        *self.lock() += 1;
    }

    fn done(&self) {
        let mut count = self.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    /// Wait until nothing is pending. Returns false on timeout.
    fn wait(&self, timeout: Duration) -> bool {
        let guard = self.lock();
        let (guard, _) = self
            .drained
            .wait_timeout_while(guard, timeout, |count| *count > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *guard == 0
    }
}

/// Reporting client posting JSON events to an HTTP collector.
#[derive(Debug)]
pub struct HttpReportingClient {
    sender: mpsc::Sender<ReportEvent>,
    pending: Arc<Pending>,
    origin: Origin,
}

impl HttpReportingClient {
    /// Start the client and its delivery worker.
    pub fn new(settings: HttpClientSettings) -> Result<Self, ClientError> {
        if settings.queue_capacity == 0 {
            return Err(ClientError::ZeroQueueCapacity);
        }

        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientError::Worker)?;

        let (sender, receiver) = mpsc::channel(settings.queue_capacity);
        let pending = Arc::new(Pending::default());
        let worker = Worker {
            http,
            endpoint: settings.endpoint.clone(),
            auth_token: settings.auth_token,
            pending: Arc::clone(&pending),
        };

        thread::Builder::new()
            .name("report-delivery".to_string())
            .spawn(move || runtime.block_on(worker.run(receiver)))
            .map_err(ClientError::Worker)?;

        tracing::info!(
            endpoint = %settings.endpoint,
            queue_capacity = settings.queue_capacity,
            "Reporting client started"
        );

        Ok(Self {
            sender,
            pending,
            origin: settings.origin,
        })
    }

    fn enqueue(&self, event: ReportEvent) -> Option<EventId> {
        let id = event.event_id;
        self.pending.add();
        match self.sender.try_send(event) {
            Ok(()) => Some(id),
            Err(TrySendError::Full(_)) => {
                self.pending.done();
                metrics::record_dropped();
                tracing::warn!(event_id = %id, "Report queue full, dropping event");
                None
            }
            Err(TrySendError::Closed(_)) => {
                self.pending.done();
                metrics::record_dropped();
                tracing::warn!(event_id = %id, "Report worker stopped, dropping event");
                None
            }
        }
    }
}

impl ReportingClient for HttpReportingClient {
    fn flush(&self, timeout: Duration) -> bool {
        self.pending.wait(timeout)
    }

    fn recover(&self, error: &LoggedError, hint: &Hint, scope: &Scope) -> Option<EventId> {
        self.enqueue(ReportEvent::exception(
            error,
            Mechanism::panic(),
            hint,
            scope,
            &self.origin,
        ))
    }

    fn capture_exception(&self, error: &LoggedError, hint: &Hint, scope: &Scope) -> Option<EventId> {
        self.enqueue(ReportEvent::exception(
            error,
            Mechanism::generic(),
            hint,
            scope,
            &self.origin,
        ))
    }

    fn capture_message(&self, message: &str, _hint: &Hint, scope: &Scope) -> Option<EventId> {
        self.enqueue(ReportEvent::message(message, scope, &self.origin))
    }
}

struct Worker {
    http: reqwest::Client,
    endpoint: Url,
    auth_token: Option<String>,
    pending: Arc<Pending>,
}

impl Worker {
    async fn run(self, mut receiver: mpsc::Receiver<ReportEvent>) {
        while let Some(event) = receiver.recv().await {
            match self.deliver(&event).await {
                Ok(()) => metrics::record_delivery(true),
                Err(e) => {
                    metrics::record_delivery(false);
                    tracing::warn!(
                        event_id = %event.event_id,
                        error = %e,
                        "Failed to deliver report"
                    );
                }
            }
            self.pending.done();
        }
        tracing::debug!("Report delivery worker stopped");
    }

    async fn deliver(&self, event: &ReportEvent) -> Result<(), DeliveryError> {
        let mut request = self.http.post(self.endpoint.clone()).json(event);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let status = request.send().await?.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(status.as_u16()));
        }
        Ok(())
    }
}
