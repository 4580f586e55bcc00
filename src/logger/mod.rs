//! Logging facade.
//!
//! # Data Flow
//! ```text
//! logger.error("db failed", [Field::error(e)])
//!     → facade.rs (call-site fields ++ context fields → Entry)
//!     → every attached sink with enabled(level)
//!         → sink.write(entry); failures are logged, never returned
//! ```
//!
//! # Design Decisions
//! - Context only grows by derivation (`add_field`, `with`); a parent never
//!   sees fields added to its children
//! - Sinks are shared, not owned; derived loggers fan out to the same sinks
//! - No global logger; handles are passed explicitly

pub mod builder;
pub mod entry;
pub mod facade;
pub mod level;

pub use builder::{build_logger, build_logger_with, reporting_options, BuildError};
pub use entry::Entry;
pub use facade::Logger;
pub use level::{Level, ParseLevelError};
