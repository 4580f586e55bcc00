//! Sink subsystem.
//!
//! # Data Flow
//! ```text
//! Logger::log
//!     → for each attached sink (attachment order):
//!         enabled(level)?  no → skip this sink only
//!         write(entry)     err → reported, never returned to the caller
//!
//! Logger::sync (shutdown)
//!     → sync() on every sink
//! ```
//!
//! # Design Decisions
//! - One capability trait: console and remote reporting both implement it
//! - Sinks are shared (`Arc<dyn Sink>`); context is added by deriving, not mutating
//! - The console sink delegates formatting to the installed `tracing` subscriber

pub mod console;
pub mod types;

pub use console::ConsoleSink;
pub use types::{Sink, SinkError};
