//! Configuration loading from disk.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{LogConfig, Mode};
use crate::config::validation::{validate_config, ValidationError};
use crate::logger::Level;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file, apply environment overrides, and validate.
pub fn load_config(path: &Path) -> Result<LogConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: LogConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |name| env::var(name).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(
        path = %path.display(),
        service = %config.service,
        mode = %config.mode,
        "Configuration loaded"
    );
    Ok(config)
}

/// Overlay `SERVICE_NAME`, `MODE`, `LOG_LEVEL` and `REPORTING_ENDPOINT`.
///
/// Empty values are ignored; an unknown mode keeps the file value.
pub fn apply_env_overrides<F>(config: &mut LogConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(service) = lookup("SERVICE_NAME") {
        config.service = service;
    }
    if let Some(raw) = lookup("MODE") {
        match Mode::parse(&raw) {
            Some(mode) => config.mode = mode,
            None => tracing::warn!(mode = %raw, "Unknown MODE override ignored"),
        }
    }
    if let Some(raw) = lookup("LOG_LEVEL") {
        config.log_level = Level::from_config(&raw);
    }
    if let Some(endpoint) = lookup("REPORTING_ENDPOINT") {
        config.reporting.endpoint = Some(endpoint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_win() {
        let mut config = LogConfig::default();
        apply_env_overrides(
            &mut config,
            env_of(&[
                ("SERVICE_NAME", "billing"),
                ("MODE", "production"),
                ("LOG_LEVEL", "warn"),
                ("REPORTING_ENDPOINT", "http://127.0.0.1:9000/events"),
            ]),
        );

        assert_eq!(config.service, "billing");
        assert_eq!(config.mode, Mode::Production);
        assert_eq!(config.log_level, Level::Warn);
        assert_eq!(
            config.reporting.endpoint.as_deref(),
            Some("http://127.0.0.1:9000/events")
        );
    }

    #[test]
    fn test_empty_and_unknown_overrides_ignored() {
        let mut config = LogConfig::default();
        apply_env_overrides(&mut config, env_of(&[("SERVICE_NAME", ""), ("MODE", "qa")]));
        assert_eq!(config.service, "profile");
        assert_eq!(config.mode, Mode::Local);
    }

    #[test]
    fn test_load_reports_validation_errors() {
        let path = env::temp_dir().join(format!("profile-log-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "service = \"\"\n[reporting]\nqueue_capacity = 0").unwrap();
        drop(file);

        let err = load_config(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.field == "reporting.queue_capacity"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/profile-log.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
