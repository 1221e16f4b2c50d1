//! Log backends receiving finished records.
//!
//! # Responsibilities
//! - Define the `LogSink` seam between record building and the backend
//! - Emit records as `tracing` events (default backend)
//! - Capture records in memory for tests and embedding hosts
//! - Hold the process-wide default sink
//!
//! # Design Decisions
//! - `emit` is infallible: a failing backend must not break the request
//! - The default sink is set at most once; before that, `TracingSink` is used

use serde_json::Value;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::record::fields::{
    ELAPSED_MILLISECONDS, IP, METHOD, PATH, REQUEST_KEY, STATUS_CODE,
};
use crate::record::{LogRecord, Severity};

/// `tracing` target used for transaction records.
pub const TARGET: &str = "communication_log";

static DEFAULT_SINK: OnceLock<Arc<dyn LogSink>> = OnceLock::new();

/// Destination for transaction records.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: &LogRecord);
}

/// Install the process-wide default sink. Fails if one is already installed.
pub fn init_default_sink(sink: Arc<dyn LogSink>) -> Result<(), Arc<dyn LogSink>> {
    DEFAULT_SINK.set(sink)
}

/// The installed default sink, or a fresh [`TracingSink`].
pub fn default_sink() -> Arc<dyn LogSink> {
    DEFAULT_SINK
        .get()
        .cloned()
        .unwrap_or_else(|| Arc::new(TracingSink))
}

/// Emits each record as one `tracing` event on the `communication_log` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, record: &LogRecord) {
        let message = record.message();
        let properties = record.to_json();
        let method = text(record, METHOD);
        let path = text(record, PATH);
        let ip = text(record, IP);
        let status_code = text(record, STATUS_CODE);
        let elapsed_ms = text(record, ELAPSED_MILLISECONDS);
        let request_key = text(record, REQUEST_KEY);

        match record.severity() {
            Severity::Information => tracing::info!(
                target: TARGET,
                method = %method,
                path = %path,
                ip = %ip,
                status_code = %status_code,
                elapsed_ms = %elapsed_ms,
                request_key = %request_key,
                properties = %properties,
                "{message}"
            ),
            Severity::Error => tracing::error!(
                target: TARGET,
                method = %method,
                path = %path,
                ip = %ip,
                status_code = %status_code,
                elapsed_ms = %elapsed_ms,
                request_key = %request_key,
                properties = %properties,
                "{message}"
            ),
        }
    }
}

fn text(record: &LogRecord, name: &str) -> String {
    match record.get(name) {
        Some(Value::String(value)) => value.clone(),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

/// Keeps every emitted record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return everything captured so far.
    pub fn take(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn emit(&self, record: &LogRecord) {
        self.lock().push(record.clone());
    }
}
