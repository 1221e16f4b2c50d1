//! Transaction data model.
//!
//! # Data Flow
//! ```text
//! host request/response
//!     → context.rs (TransactionContext: request + response + items)
//!     → items.rs (per-transaction scratch state shared between hooks)
//!     → error.rs (handler outcome: typed API error or unhandled failure)
//! ```
//!
//! # Design Decisions
//! - Plain data structs with optional sub-structures; a missing request or
//!   response is a normal state, not an error
//! - Bodies are `Bytes`: reading them for logging never consumes the host's copy
//! - Items are typed fields instead of a string-keyed bag
//! - Headers are `HeaderMap`s taken from the host unchanged; text conversion
//!   happens only when a record is built

pub mod context;
pub mod error;
pub mod items;

pub use context::{header_text, TransactionContext, TransactionRequest, TransactionResponse};
pub use error::{ApiError, ErrorItem, ErrorsResponse, TransactionError};
pub use items::TransactionItems;

use axum::http::HeaderName;

/// Client address forwarded by a proxy.
pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Elapsed handling time, in whole milliseconds.
pub const X_INTERNAL_TIME: HeaderName = HeaderName::from_static("x-internal-time");

/// Correlation key, read from the request and echoed on the response.
pub const REQUEST_KEY: HeaderName = HeaderName::from_static("requestkey");

/// Account the transaction was performed for.
pub const ACCOUNT_ID: HeaderName = HeaderName::from_static("accountid");

pub const APPLICATION_JSON: &str = "application/json";

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
