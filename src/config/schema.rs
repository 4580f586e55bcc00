//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logger::Level;

/// Root configuration for the logging pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Service identity, attached as `source` on the console and as the
    /// `service` tag on reports.
    pub service: String,

    /// Deployment mode; only `production` reports remotely.
    pub mode: Mode,

    /// Minimum level written to the console.
    pub log_level: Level,

    /// Remote error-reporting settings.
    pub reporting: ReportingConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service: "profile".to_string(),
            mode: Mode::Local,
            log_level: Level::Info,
            reporting: ReportingConfig::default(),
        }
    }
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Local,
    Development,
    Staging,
    Production,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Local => "local",
            Mode::Development => "development",
            Mode::Staging => "staging",
            Mode::Production => "production",
        }
    }

    /// Parse a mode name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Mode::Local),
            "development" | "dev" => Some(Mode::Development),
            "staging" => Some(Mode::Staging),
            "production" | "prod" => Some(Mode::Production),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote error-reporting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportingConfig {
    pub enabled: bool,

    /// Collector URL events are POSTed to.
    pub endpoint: Option<String>,

    /// Bearer token sent with every event.
    pub auth_token: Option<String>,

    /// Minimum level forwarded to the collector.
    pub min_level: Level,

    /// Flush deadline; raised to 3s when lower.
    pub flush_timeout_ms: u64,

    /// Per-request timeout for deliveries.
    pub request_timeout_secs: u64,

    /// Events buffered before new ones are dropped.
    pub queue_capacity: usize,

    /// Static tags attached to every report.
    pub tags: BTreeMap<String, String>,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            auth_token: None,
            min_level: Level::Error,
            flush_timeout_ms: 3_000,
            request_timeout_secs: 10,
            queue_capacity: 256,
            tags: BTreeMap::new(),
        }
    }
}

impl ReportingConfig {
    pub fn flush_timeout(&self) -> Duration {
        Duration::from_millis(self.flush_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: LogConfig = toml::from_str("service = \"billing\"").unwrap();
        assert_eq!(config.service, "billing");
        assert_eq!(config.mode, Mode::Local);
        assert_eq!(config.log_level, Level::Info);
        assert!(!config.reporting.enabled);
        assert_eq!(config.reporting.min_level, Level::Error);
        assert_eq!(config.reporting.queue_capacity, 256);
    }

    #[test]
    fn test_full_config() {
        let config: LogConfig = toml::from_str(
            r#"
            service = "profile"
            mode = "production"
            log_level = "debug"

            [reporting]
            enabled = true
            endpoint = "https://errors.example.com/api/events"
            min_level = "warn"
            flush_timeout_ms = 1000

            [reporting.tags]
            team = "identity"
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, Mode::Production);
        assert_eq!(config.log_level, Level::Debug);
        assert_eq!(config.reporting.min_level, Level::Warn);
        assert_eq!(config.reporting.flush_timeout(), Duration::from_secs(1));
        assert_eq!(config.reporting.tags["team"], "identity");
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let config: LogConfig = toml::from_str("log_level = \"verbose\"").unwrap();
        assert_eq!(config.log_level, Level::Info);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("PROD"), Some(Mode::Production));
        assert_eq!(Mode::parse("staging"), Some(Mode::Staging));
        assert_eq!(Mode::parse("qa"), None);
    }
}
