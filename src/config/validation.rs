//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the reporting endpoint is usable when reporting is on
//! - Validate value ranges (queue capacity > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LogConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use url::Url;

use crate::config::schema::LogConfig;

/// One semantic problem found in a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a config for semantic problems, collecting all of them.
pub fn validate_config(config: &LogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.service.trim().is_empty() {
        errors.push(ValidationError::new("service", "must not be empty"));
    }

    let reporting = &config.reporting;
    match reporting.endpoint.as_deref() {
        None | Some("") if reporting.enabled => {
            errors.push(ValidationError::new(
                "reporting.endpoint",
                "required when reporting is enabled",
            ));
        }
        None | Some("") => {}
        Some(raw) => match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "reporting.endpoint",
                format!("unsupported scheme `{}`", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(
                "reporting.endpoint",
                format!("invalid URL: {e}"),
            )),
        },
    }

    if reporting.queue_capacity == 0 {
        errors.push(ValidationError::new(
            "reporting.queue_capacity",
            "must be greater than zero",
        ));
    }

    if reporting.tags.keys().any(|k| k.trim().is_empty()) {
        errors.push(ValidationError::new("reporting.tags", "tag keys must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
