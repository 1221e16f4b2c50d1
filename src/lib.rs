//! HTTP transaction logging.
//!
//! Every request/response pair passing through a host pipeline becomes one
//! structured record: normalized request and response fields, redacted
//! bodies, timing and correlation keys, with error or information severity.

pub mod config;
pub mod extract;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod record;
pub mod transaction;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{add_log_pipelines, CommunicationLogLayer, Pipelines};
pub use record::{CommunicationLogger, LogRecord, LogSink, Severity, TransactionLogger};
pub use transaction::{TransactionContext, TransactionError};
