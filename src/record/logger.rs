//! Transaction record builder.
//!
//! # Responsibilities
//! - Pull every normalized field out of a transaction
//! - Attach bounded error details
//! - Choose severity and message template
//! - Hand the finished record to the sink
//!
//! # Design Decisions
//! - A missing context is the only failure; everything else degrades to defaults
//! - Additional info is appended after the built-in fields and never replaces one
//! - Success records can be suppressed per transaction; error records cannot
//! - A translated API error is an error record even though it logs at Information

use serde_json::Value;
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

use crate::config::LoggerConfig;
use crate::extract::fields::{status_description, TransactionView};
use crate::extract::redaction::RedactionList;
use crate::observability::metrics;
use crate::record::fields::*;
use crate::record::sink::{default_sink, LogSink};
use crate::record::{LogRecord, Severity};
use crate::transaction::{TransactionContext, TransactionError};

pub const DEFAULT_INFORMATION_TITLE: &str =
    "HTTP {Method} {Path} from {Ip} responded {StatusCode} in {ElapsedMilliseconds} ms";

pub const DEFAULT_ERROR_TITLE: &str =
    "HTTP {Method} {Path} from {Ip} responded {StatusCode} in {ElapsedMilliseconds} ms";

/// Longest `ErrorMessage`, in characters.
pub const MAX_ERROR_MESSAGE_CHARS: usize = 256;

/// Longest `ErrorException`, in characters.
pub const MAX_ERROR_EXCEPTION_CHARS: usize = 768;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("a transaction context is required to log a transaction")]
    ContextRequired,
}

/// Writes one record per transaction.
pub trait TransactionLogger: Send + Sync {
    /// Log a completed transaction. Without an error the record is skipped
    /// when the transaction disabled logging.
    fn log_data(
        &self,
        context: Option<&TransactionContext>,
        error: Option<&TransactionError>,
    ) -> Result<(), LogError>;

    /// Log a transaction whose handler error was translated into a response.
    /// Always written, whatever the transaction's logging flag says.
    fn log_translated_error(&self, context: Option<&TransactionContext>) -> Result<(), LogError>;
}

/// Default [`TransactionLogger`]: extracts fields and emits to a [`LogSink`].
#[derive(Clone)]
pub struct CommunicationLogger {
    config: Arc<LoggerConfig>,
    redaction: RedactionList,
    sink: Arc<dyn LogSink>,
}

impl CommunicationLogger {
    /// Logger writing to the process-wide default sink.
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_sink(config, default_sink())
    }

    pub fn with_sink(config: LoggerConfig, sink: Arc<dyn LogSink>) -> Self {
        Self {
            redaction: config.redaction(),
            config: Arc::new(config),
            sink,
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn build_record(
        &self,
        context: Option<&TransactionContext>,
        error: Option<&TransactionError>,
    ) -> Result<LogRecord, LogError> {
        let context = context.ok_or(LogError::ContextRequired)?;
        let view = TransactionView::from(context);
        let status_code = view.status_code(error);

        let mut properties = vec![
            field(METHOD, view.method()),
            field(PATH, view.path()),
            field(HOST, view.host()),
            field(PORT, view.port()),
            field(URL_BASE, view.url_base()),
            field(QUERY, view.query()),
            field(QUERY_STRING, view.query_string()),
            field(REQUEST_HEADERS, view.request_headers()),
            field(REQUEST_BODY, view.request_body(&self.redaction)),
            field(IP, view.ip()),
            field(REQUEST_KEY, view.request_key()),
            field(ACCOUNT_ID, view.account_id()),
            field(IS_SUCCESSFUL, status_code < 400),
            field(STATUS_CODE, status_code),
            field(STATUS_DESCRIPTION, status_description(status_code)),
            field(STATUS_CODE_FAMILY, view.status_code_family(error)),
            field(PROTOCOL_VERSION, view.protocol_version()),
            field(ERROR_EXCEPTION, error.map(describe_error)),
            field(
                ERROR_MESSAGE,
                error.map(|error| truncate(&error.to_string(), MAX_ERROR_MESSAGE_CHARS)),
            ),
            field(RESPONSE_CONTENT, view.response_content()),
            field(CONTENT_TYPE, view.content_type()),
            field(CONTENT_LENGTH, view.response_length()),
            field(RESPONSE_HEADERS, view.response_headers()),
            field(ELAPSED_MILLISECONDS, view.elapsed_milliseconds()),
            field(VERSION, self.config.version.clone()),
        ];

        let items = &context.items;
        if let Some(controller) = &items.controller {
            properties.push(field(CONTROLLER, controller.as_str()));
        }
        if let Some(operation) = &items.operation {
            properties.push(field(OPERATION, operation.as_str()));
        }
        for (key, value) in &items.additional_info {
            if BUILT_IN.contains(&key.as_str()) {
                continue;
            }
            properties.push((key.clone(), value.clone()));
        }

        let severity = if error.is_some() || status_code >= 500 {
            Severity::Error
        } else {
            Severity::Information
        };

        Ok(LogRecord::new(severity, self.title(severity), properties))
    }

    fn title(&self, severity: Severity) -> &str {
        let (configured, default) = match severity {
            Severity::Information => (&self.config.information_title, DEFAULT_INFORMATION_TITLE),
            Severity::Error => (&self.config.error_title, DEFAULT_ERROR_TITLE),
        };

        configured
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(default)
    }
}

impl Default for CommunicationLogger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl std::fmt::Debug for CommunicationLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommunicationLogger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TransactionLogger for CommunicationLogger {
    fn log_data(
        &self,
        context: Option<&TransactionContext>,
        error: Option<&TransactionError>,
    ) -> Result<(), LogError> {
        let context = context.ok_or(LogError::ContextRequired)?;

        if error.is_none() && context.items.is_logging_disabled() {
            metrics::record_suppressed();
            return Ok(());
        }

        self.emit(context, error)
    }

    fn log_translated_error(&self, context: Option<&TransactionContext>) -> Result<(), LogError> {
        let context = context.ok_or(LogError::ContextRequired)?;
        self.emit(context, None)
    }
}

impl CommunicationLogger {
    fn emit(
        &self,
        context: &TransactionContext,
        error: Option<&TransactionError>,
    ) -> Result<(), LogError> {
        let record = self.build_record(Some(context), error)?;
        let family = record
            .get(STATUS_CODE_FAMILY)
            .and_then(Value::as_str)
            .unwrap_or("0XX");
        let elapsed = record
            .get(ELAPSED_MILLISECONDS)
            .and_then(Value::as_i64)
            .unwrap_or(-1);
        metrics::record_transaction(record.severity(), family, elapsed);

        self.sink.emit(&record);
        Ok(())
    }
}

fn field(name: &str, value: impl Into<Value>) -> (String, Value) {
    (name.to_string(), value.into())
}

/// Debug rendering followed by the source chain, bounded.
fn describe_error(error: &TransactionError) -> String {
    let mut description = format!("{error:?}");
    let mut source = error.source();
    while let Some(cause) = source {
        description.push_str("\ncaused by: ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }
    truncate(&description, MAX_ERROR_EXCEPTION_CHARS)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}
