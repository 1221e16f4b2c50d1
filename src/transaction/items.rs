//! Per-transaction scratch state shared between pipeline hooks.

use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;

/// State written and read by the hooks of a single transaction.
#[derive(Debug, Clone, Default)]
pub struct TransactionItems {
    /// Set by the pre-request hook, taken by the stamping hook.
    pub stopwatch: Option<Instant>,
    /// Correlation key for this transaction.
    pub request_key: Option<String>,
    pub account_id: Option<String>,
    pub controller: Option<String>,
    pub operation: Option<String>,
    /// Extra key/value pairs appended to the log record.
    pub additional_info: BTreeMap<String, Value>,
    disable_logging: bool,
}

impl TransactionItems {
    /// Skip the success-path log record. Errors are still logged.
    pub fn disable_logging(&mut self) {
        self.disable_logging = true;
    }

    pub fn is_logging_disabled(&self) -> bool {
        self.disable_logging
    }

    pub fn start_stopwatch(&mut self) {
        self.stopwatch = Some(Instant::now());
    }

    /// Stop the stopwatch and return the elapsed whole milliseconds.
    pub fn stop_stopwatch(&mut self) -> Option<u64> {
        self.stopwatch
            .take()
            .map(|started| u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX))
    }

    pub fn add_info(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.additional_info.insert(key.into(), value.into());
    }
}
