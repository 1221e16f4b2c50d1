//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Service diagnostics:
//!     → logging.rs (tracing subscriber: env filter + fmt/json layer)
//!
//! Transaction records:
//!     → record::sink::TracingSink (target "communication_log")
//!     → metrics.rs (record counters, elapsed histogram)
//!
//! Consumers:
//!     → stdout (human-readable or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Metrics are cheap (atomic increments) and no-ops until an exporter is installed
//! - Subscriber installation tolerates an already-installed global subscriber

pub mod logging;
pub mod metrics;
