//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber the console sink writes through
//! - Pick the output format from the deployment mode
//!
//! # Design Decisions
//! - JSON format for production, pretty format elsewhere
//! - `RUST_LOG` wins over the configured level when set

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::Mode;
use crate::logger::Level;

/// `tracing` filter directive matching a pipeline level.
pub fn filter_directive(level: Level) -> &'static str {
    match level {
        Level::Debug => "debug",
        Level::Info => "info",
        Level::Warn => "warn",
        Level::Error | Level::DPanic | Level::Panic | Level::Fatal => "error",
    }
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_tracing(level: Level, mode: Mode) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));
    let registry = Registry::default().with(filter);

    if mode == Mode::Production {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    }
}
