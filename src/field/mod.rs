//! Structured field model.
//!
//! # Data Flow
//! ```text
//! call site / Logger::add_field
//!     → typed.rs (Field: key + FieldKind + i64 slot + payload)
//!     → carried on an Entry to every sink
//!     → value.rs (decode: Field → Option<FieldValue>)
//!     → tags, extras, console rendering
//! ```
//!
//! # Design Decisions
//! - `FieldKind` is a closed enum; decode is one exhaustive match
//! - Numeric kinds share a single 64-bit slot (floats stored as raw bits)
//! - Errors carry an explicit `Exception` / `RecoveredPanic` tag
//! - Fields are cheap to clone (payloads behind `Arc`) so context copies stay cheap

pub mod error;
pub mod kind;
pub mod loose;
pub mod typed;
pub mod value;

pub use error::{ErrorKind, LoggedError, MessageError};
pub use kind::FieldKind;
pub use loose::{loose_fields, LooseValue, UNKNOWN_KEY};
pub use typed::{append_fields, Field, Payload, ERROR_KEY, TAG_PREFIX};
pub use value::{decode, Complex, DecodeError, FieldValue};
