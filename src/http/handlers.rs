//! Demo routes.
//!
//! Each route exercises one part of the transaction contract: suppressed
//! logging, body echo, account stamping, and both error kinds.

use axum::{
    body::Bytes,
    extract::{Extension, Path},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::pipeline::{AccountId, AdditionalInfo, CorrelationKey, DisableLogging, RouteLabels};
use crate::transaction::{ApiError, ErrorsResponse, TransactionError};

/// Liveness probe. Not logged on success.
pub async fn health() -> impl IntoResponse {
    (DisableLogging, Json(json!({ "status": "ok" })))
}

/// Send the request body back with the same content type.
pub async fn echo(headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| header::HeaderValue::from_static("text/plain"));

    ([(header::CONTENT_TYPE, content_type)], body)
}

/// Record an update for an account; the account id is echoed as `AccountId`.
pub async fn update_account(
    Path(account_id): Path<String>,
    Extension(CorrelationKey(request_key)): Extension<CorrelationKey>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(fields) = payload.as_object() else {
        return Err(ApiError::unprocessable_entity().with_content(
            &ErrorsResponse::with_single_error("payload must be a JSON object", "body"),
        ));
    };

    let info = AdditionalInfo::default().with("UpdatedFields", fields.len());

    Ok((
        StatusCode::CREATED,
        AccountId(account_id.clone()),
        RouteLabels::new("Accounts", "Update"),
        info,
        Json(json!({ "accountId": account_id, "requestKey": request_key })),
    ))
}

/// Always fails with a typed API error.
pub async fn api_error() -> Result<StatusCode, ApiError> {
    Err(ApiError::conflict().with_content(&ErrorsResponse::with_single_error(
        "resource already exists",
        "id",
    )))
}

/// Always fails with an unexpected error.
pub async fn unhandled_error() -> Result<StatusCode, TransactionError> {
    Err(TransactionError::unhandled(std::io::Error::other(
        "simulated failure",
    )))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found()
}
