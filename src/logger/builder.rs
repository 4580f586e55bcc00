//! Pipeline assembly from configuration.
//!
//! ```text
//! LogConfig
//!     → ConsoleSink(log_level) with `source = service`
//!     → RemoteReportingCore(reporting.*) when reporting is enabled,
//!       an endpoint is set, and mode is production
//! ```

use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::config::{LogConfig, Mode};
use crate::field::Field;
use crate::logger::facade::Logger;
use crate::reporting::{
    ClientError, HttpClientSettings, HttpReportingClient, Origin, RemoteReportingCore,
    ReportingClient, ReportingOptions,
};
use crate::sink::{ConsoleSink, Sink};

/// Errors raised while assembling a logger.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid reporting endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("failed to start reporting client: {0}")]
    Client(#[from] ClientError),
}

/// Whether `config` asks for remote reporting.
pub fn reporting_active(config: &LogConfig) -> bool {
    config.reporting.enabled
        && config.mode == Mode::Production
        && config
            .reporting
            .endpoint
            .as_deref()
            .is_some_and(|e| !e.is_empty())
}

/// Core options derived from config.
pub fn reporting_options(config: &LogConfig) -> ReportingOptions {
    ReportingOptions {
        service: config.service.clone(),
        min_level: config.reporting.min_level,
        flush_timeout: config.reporting.flush_timeout(),
        tags: config.reporting.tags.clone(),
        fields: Vec::new(),
    }
}

/// Build the logger described by `config`, starting an HTTP reporting
/// client when remote reporting is active.
pub fn build_logger(config: &LogConfig) -> Result<Logger, BuildError> {
    if !reporting_active(config) {
        return Ok(build_logger_with(config, None));
    }

    let endpoint = config.reporting.endpoint.as_deref().unwrap_or_default();
    let client = HttpReportingClient::new(HttpClientSettings {
        endpoint: Url::parse(endpoint)?,
        auth_token: config.reporting.auth_token.clone(),
        request_timeout: config.reporting.request_timeout(),
        queue_capacity: config.reporting.queue_capacity,
        origin: Origin {
            server_name: config.service.clone(),
            environment: config.mode.to_string(),
        },
    })?;
    Ok(build_logger_with(config, Some(Arc::new(client))))
}

/// Build the logger described by `config` around a caller-supplied client.
///
/// The client is attached only when remote reporting is active.
pub fn build_logger_with(config: &LogConfig, client: Option<Arc<dyn ReportingClient>>) -> Logger {
    let console = ConsoleSink::new(config.log_level)
        .with(&[Field::string("source", config.service.clone())]);
    let mut sinks: Vec<Arc<dyn Sink>> = vec![console];

    match client {
        Some(client) if reporting_active(config) => {
            let core = RemoteReportingCore::new(reporting_options(config), client);
            tracing::info!(
                service = %config.service,
                min_level = %config.reporting.min_level,
                flush_timeout_ms = core.flush_timeout().as_millis() as u64,
                "Remote reporting enabled"
            );
            sinks.push(Arc::new(core));
        }
        _ => tracing::debug!(
            service = %config.service,
            mode = %config.mode,
            "Remote reporting disabled"
        ),
    }

    Logger::new(sinks)
}
