//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges
//! - Reject record templates with broken property holes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::record::template::{self, TemplateError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },

    #[error("{field}: {source}")]
    InvalidTemplate {
        field: &'static str,
        source: TemplateError,
    },

    #[error("communication_log.blacklist contains an empty field name")]
    EmptyBlacklistEntry,
}

pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    for (field, limit) in [
        ("limits.max_body_bytes", config.limits.max_body_bytes),
        ("limits.max_response_bytes", config.limits.max_response_bytes),
    ] {
        if limit == 0 {
            errors.push(ValidationError::ZeroLimit { field });
        }
    }

    let log = &config.communication_log;
    for (field, title) in [
        ("communication_log.information_title", &log.information_title),
        ("communication_log.error_title", &log.error_title),
    ] {
        if let Some(Err(source)) = title.as_deref().map(template::validate) {
            errors.push(ValidationError::InvalidTemplate { field, source });
        }
    }

    if log.blacklist.iter().any(|field| field.is_empty()) {
        errors.push(ValidationError::EmptyBlacklistEntry);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
