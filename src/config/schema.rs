//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::extract::redaction::RedactionList;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Transaction record settings.
    pub communication_log: LoggerConfig,

    /// Error body serialization.
    pub serialization: SerializationConfig,

    /// Request limits enforced by the host adapter.
    pub limits: LimitsConfig,

    /// Diagnostics: log level, format, metrics exporter.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Transaction record settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Request body fields to mask (case-sensitive, top level only).
    pub blacklist: Vec<String>,

    /// Template for success records. Unset or empty uses the default.
    pub information_title: Option<String>,

    /// Template for error records. Unset or empty uses the default.
    pub error_title: Option<String>,

    /// Tag attached to every record as `Version`.
    pub version: Option<String>,
}

impl LoggerConfig {
    pub fn redaction(&self) -> RedactionList {
        self.blacklist.iter().cloned().collect()
    }
}

/// JSON settings for error bodies written by the exception handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SerializationConfig {
    /// Indent error bodies.
    pub pretty: bool,
}

impl SerializationConfig {
    pub fn to_vec<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<Vec<u8>> {
        if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
    }
}

/// Body buffering limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest request body buffered for logging, in bytes.
    pub max_body_bytes: usize,
    /// Largest response body buffered for logging, in bytes. Larger
    /// responses are sent as they are and logged without their body.
    pub max_response_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024,
            max_response_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Prometheus exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.communication_log.blacklist.is_empty());
        assert_eq!(config.limits.max_body_bytes, 2 * 1024 * 1024);
        assert_eq!(config.limits.max_response_bytes, 2 * 1024 * 1024);
        assert!(!config.serialization.pretty);
    }

    #[test]
    fn test_communication_log_section() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [communication_log]
            blacklist = ["password", "cardNumber"]
            information_title = "HTTP {Method} {Path}"
            version = "1.4.0"
            "#,
        )
        .unwrap();

        let redaction = config.communication_log.redaction();
        assert!(redaction.contains("password"));
        assert!(redaction.contains("cardNumber"));
        assert_eq!(config.communication_log.version.as_deref(), Some("1.4.0"));
        assert_eq!(config.communication_log.error_title, None);
    }

    #[test]
    fn test_serialization_pretty() {
        let compact = SerializationConfig::default().to_vec(&serde_json::json!({ "a": 1 })).unwrap();
        assert_eq!(compact, br#"{"a":1}"#);

        let pretty = SerializationConfig { pretty: true }
            .to_vec(&serde_json::json!({ "a": 1 }))
            .unwrap();
        assert!(pretty.contains(&b'\n'));
    }
}
