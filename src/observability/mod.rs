//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline internals produce:
//!     → logging.rs (tracing subscriber for diagnostics and console output)
//!     → metrics.rs (counters behind the `metrics` facade)
//!
//! Consumers:
//!     → stdout (pretty locally, JSON in production)
//!     → whichever metrics recorder the host process installs
//! ```
//!
//! # Design Decisions
//! - No recorder is installed here; without one, counters are no-ops
//! - Log format follows the deployment mode

pub mod logging;
pub mod metrics;
