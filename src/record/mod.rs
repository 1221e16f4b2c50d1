//! Transaction log records.
//!
//! # Data Flow
//! ```text
//! TransactionContext + Option<TransactionError>
//!     → logger.rs (CommunicationLogger: extract fields, pick severity/template)
//!     → LogRecord (ordered properties, immutable)
//!     → sink.rs (LogSink: tracing by default, memory for tests)
//! ```
//!
//! # Design Decisions
//! - A record is built in full before the sink sees it; the sink gets one call
//! - Properties keep insertion order so rendered output is stable
//! - Template rendering is lazy; sinks that only want properties skip it

pub mod fields;
pub mod logger;
pub mod sink;
pub mod template;

use serde_json::{Map, Value};
use std::fmt;

pub use logger::{CommunicationLogger, LogError, TransactionLogger};
pub use sink::{default_sink, init_default_sink, LogSink, MemorySink, TracingSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Information,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Information => "information",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured event describing a finished transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    severity: Severity,
    template: String,
    properties: Vec<(String, Value)>,
}

impl LogRecord {
    pub fn new(severity: Severity, template: impl Into<String>, properties: Vec<(String, Value)>) -> Self {
        Self {
            severity,
            template: template.into(),
            properties,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn properties(&self) -> &[(String, Value)] {
        &self.properties
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Template with property values substituted.
    pub fn message(&self) -> String {
        template::render(&self.template, &self.properties)
    }

    /// Properties as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.properties
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Map<String, Value>>(),
        )
    }
}
