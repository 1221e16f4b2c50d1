//! Handler failures turned into responses and records.
//!
//! # Responsibilities
//! - Translate a typed API error into a JSON response the host sends
//! - Log handled API errors as transactions, even when logging was disabled
//! - Log everything else as an error and leave the response to the host

use axum::body::Bytes;
use axum::http::{header, HeaderValue};

use crate::config::SerializationConfig;
use crate::record::TransactionLogger;
use crate::transaction::{TransactionContext, TransactionError, TransactionResponse, APPLICATION_JSON};

/// On-error hook body.
///
/// Returns the replacement response for an API error, `None` otherwise or
/// when there is no context.
pub fn handle_exceptions(
    context: Option<&mut TransactionContext>,
    error: &TransactionError,
    serialization: &SerializationConfig,
    logger: &dyn TransactionLogger,
) -> Option<TransactionResponse> {
    let context = context?;

    let Some(api) = error.as_api() else {
        if let Err(log_error) = logger.log_data(Some(&*context), Some(error)) {
            tracing::warn!(error = %log_error, "Failed to log unhandled error");
        }
        return None;
    };

    let mut response = TransactionResponse::new(api.status());
    if let Some(headers) = context
        .response
        .as_ref()
        .and_then(|existing| existing.headers.clone())
    {
        response.headers = Some(headers);
    }
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));

    if let Some(content) = api.content() {
        match serialization.to_vec(content) {
            Ok(body) => response.contents = Some(Bytes::from(body)),
            Err(serialize_error) => {
                tracing::warn!(
                    status = api.status(),
                    error = %serialize_error,
                    "Failed to serialize API error body"
                );
            }
        }
    }

    context.response = Some(response.clone());

    if let Err(log_error) = logger.log_translated_error(Some(&*context)) {
        tracing::warn!(error = %log_error, "Failed to log handled API error");
    }

    Some(response)
}
