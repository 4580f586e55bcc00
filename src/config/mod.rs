//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (SERVICE_NAME, MODE, LOG_LEVEL, REPORTING_ENDPOINT)
//!     → validation.rs (semantic checks)
//!     → LogConfig (validated, immutable)
//!     → logger::builder assembles the pipeline from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{LogConfig, Mode, ReportingConfig};
pub use validation::{validate_config, ValidationError};
