//! Handler outcomes that did not produce a normal response.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Failure raised while handling a transaction.
#[derive(Debug, Clone, Error)]
pub enum TransactionError {
    /// Application error that maps to a concrete HTTP response.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Anything else. Logged as an error; the host builds the response.
    #[error(transparent)]
    Unhandled(Arc<dyn std::error::Error + Send + Sync>),
}

impl TransactionError {
    pub fn unhandled<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unhandled(Arc::new(error))
    }

    pub fn from_boxed(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Unhandled(Arc::from(error))
    }

    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(api) => Some(api),
            Self::Unhandled(_) => None,
        }
    }
}

/// Typed API error: a status code plus an optional JSON body.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("request failed with status {status}")]
pub struct ApiError {
    status: u16,
    content: Option<Value>,
}

impl ApiError {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            content: None,
        }
    }

    /// Attach a body. Values that fail to serialize leave the body empty.
    pub fn with_content<T: Serialize>(mut self, content: &T) -> Self {
        self.content = serde_json::to_value(content).ok();
        self
    }

    pub fn bad_request() -> Self {
        Self::new(400)
    }

    pub fn unauthorized() -> Self {
        Self::new(401)
    }

    pub fn forbidden() -> Self {
        Self::new(403)
    }

    pub fn not_found() -> Self {
        Self::new(404)
    }

    pub fn conflict() -> Self {
        Self::new(409)
    }

    pub fn payload_too_large() -> Self {
        Self::new(413)
    }

    pub fn unprocessable_entity() -> Self {
        Self::new(422)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content(&self) -> Option<&Value> {
        self.content.as_ref()
    }
}

/// Conventional error body: a list of messages tied to request properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorsResponse {
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorItem {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl ErrorsResponse {
    pub fn with_single_error(message: impl Into<String>, property: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add_error(message, Some(property.into()));
        errors
    }

    pub fn add_error(&mut self, message: impl Into<String>, property: Option<String>) {
        self.errors.push(ErrorItem {
            message: message.into(),
            property,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_with_errors_body() {
        let error = ApiError::bad_request()
            .with_content(&ErrorsResponse::with_single_error("someerror", "someproperty"));

        assert_eq!(error.status(), 400);
        assert_eq!(
            error.content(),
            Some(&json!({ "errors": [{ "message": "someerror", "property": "someproperty" }] }))
        );
    }

    #[test]
    fn test_unhandled_error_keeps_message() {
        let error = TransactionError::unhandled(std::io::Error::other("disk on fire"));
        assert_eq!(error.to_string(), "disk on fire");
        assert!(error.as_api().is_none());
    }

    #[test]
    fn test_api_error_converts() {
        let error: TransactionError = ApiError::not_found().into();
        assert_eq!(error.as_api().map(ApiError::status), Some(404));
    }
}
