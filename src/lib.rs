//! Structured logging pipeline with a remote error-reporting sink.

pub mod config;
pub mod field;
pub mod logger;
pub mod observability;
pub mod reporting;
pub mod sink;

pub use config::LogConfig;
pub use field::{Field, FieldValue, LoggedError};
pub use logger::{build_logger, Entry, Level, Logger};
pub use sink::Sink;
