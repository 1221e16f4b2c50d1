//! Field extraction.
//!
//! # Data Flow
//! ```text
//! &TransactionContext
//!     → fields.rs (TransactionView: one accessor per loggable field)
//!     → body.rs (content-type aware decoding of request/response bodies)
//!     → redaction.rs (mask listed top-level request body fields)
//!     → serde_json::Value per field
//! ```
//!
//! # Design Decisions
//! - Accessors are pure and never fail; absent data maps to a fixed default
//! - Decoding reads shared `Bytes`, so bodies stay available to the host
//! - Redaction is applied to the top level of a JSON request body only

pub mod body;
pub mod fields;
pub mod redaction;

pub use fields::{status_code_family, status_description, TransactionView};
pub use redaction::{mask, RedactionList, MASK};
