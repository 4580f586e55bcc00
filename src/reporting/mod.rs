//! Remote error-reporting subsystem.
//!
//! # Data Flow
//! ```text
//! Logger entry (level ≥ min_level)
//!     → core.rs (gate, build scope, route by level)
//!     → scope.rs (tags vs extras, static tags first)
//!     → client.rs (ReportingClient trait)
//!         → http.rs (queue → background POST of event.rs JSON)
//!         → recording.rs (in-memory, tests and dry runs)
//! ```
//!
//! # Design Decisions
//! - The core never talks HTTP; the client seam keeps routing testable
//! - Context fields are copied on `with`, never shared mutably
//! - Flush waits at least [`MIN_FLUSH_TIMEOUT`]

pub mod client;
pub mod core;
pub mod event;
pub mod http;
pub mod recording;
pub mod scope;
pub mod types;

pub use self::client::ReportingClient;
pub use self::core::{RemoteReportingCore, ReportingOptions, MIN_FLUSH_TIMEOUT, SERVICE_TAG};
pub use self::event::{Origin, ReportEvent};
pub use self::http::{ClientError, HttpClientSettings, HttpReportingClient};
pub use self::recording::{Capture, RecordingClient};
pub use self::scope::Scope;
pub use self::types::{EventId, FlushError, Hint, ReportLevel, ScopeBuildError, UnsupportedLevelError};
