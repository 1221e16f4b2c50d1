//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Install the Prometheus exporter
//! - Count transaction records by severity and status family
//! - Track handling time as reported on the record
//!
//! # Metrics
//! - `communication_log_records_total` (counter): records emitted, by severity, status_family
//! - `communication_log_suppressed_total` (counter): success records skipped by the disable marker
//! - `communication_log_elapsed_ms` (histogram): `ElapsedMilliseconds` of emitted records
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Records without timing (`-1`) are counted but not timed

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::record::Severity;

/// Install the Prometheus exporter with an HTTP scrape listener.
///
/// Must be called from within a Tokio runtime. A failed install is logged
/// and leaves recording as a no-op.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => {
            tracing::error!(address = %addr, error = %error, "Failed to install metrics exporter")
        }
    }
}

pub fn record_transaction(severity: Severity, status_family: &str, elapsed_ms: i64) {
    counter!(
        "communication_log_records_total",
        "severity" => severity.as_str(),
        "status_family" => status_family.to_string()
    )
    .increment(1);

    if elapsed_ms >= 0 {
        histogram!("communication_log_elapsed_ms").record(elapsed_ms as f64);
    }
}

pub fn record_suppressed() {
    counter!("communication_log_suppressed_total").increment(1);
}
