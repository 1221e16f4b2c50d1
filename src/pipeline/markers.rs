//! Values handlers return to steer the transaction record.
//!
//! Handlers add these to their response tuple; the layer moves them into
//! the transaction items before any hook runs.
//!
//! ```ignore
//! async fn health() -> impl IntoResponse {
//!     (DisableLogging, "ok")
//! }
//! ```

use axum::{
    http::{Extensions, StatusCode},
    response::{IntoResponse, IntoResponseParts, Response, ResponseParts},
    Json,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::convert::Infallible;

use crate::transaction::{ApiError, TransactionError, TransactionItems};

/// Skip the success record for this transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisableLogging;

/// Account the transaction acted for; echoed as the `AccountId` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountId(pub String);

/// Controller/operation labels added to the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLabels {
    pub controller: String,
    pub operation: String,
}

impl RouteLabels {
    pub fn new(controller: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            operation: operation.into(),
        }
    }
}

/// Extra record properties. Built-in property names are never overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdditionalInfo(pub BTreeMap<String, Value>);

impl AdditionalInfo {
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

/// Request key of the current transaction, available to handlers as a
/// request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationKey(pub String);

macro_rules! response_marker {
    ($($marker:ty),+ $(,)?) => {
        $(
            impl IntoResponseParts for $marker {
                type Error = Infallible;

                fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
                    res.extensions_mut().insert(self);
                    Ok(res)
                }
            }
        )+
    };
}

response_marker!(DisableLogging, AccountId, RouteLabels, AdditionalInfo);

/// Move markers from response extensions into the transaction items.
pub fn apply_response_markers(extensions: &mut Extensions, items: &mut TransactionItems) {
    if extensions.remove::<DisableLogging>().is_some() {
        items.disable_logging();
    }

    if let Some(AccountId(account_id)) = extensions.remove::<AccountId>() {
        items.account_id = Some(account_id);
    }

    if let Some(labels) = extensions.remove::<RouteLabels>() {
        items.controller = Some(labels.controller);
        items.operation = Some(labels.operation);
    }

    if let Some(AdditionalInfo(info)) = extensions.remove::<AdditionalInfo>() {
        items.additional_info.extend(info);
    }
}

/// Error response carrying the error itself, so the layer can route it to
/// the on-error hooks.
impl IntoResponse for TransactionError {
    fn into_response(self) -> Response {
        let mut response = match &self {
            TransactionError::Api(api) => {
                let status =
                    StatusCode::from_u16(api.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                match api.content() {
                    Some(content) => (status, Json(content.clone())).into_response(),
                    None => status.into_response(),
                }
            }
            TransactionError::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        };
        response.extensions_mut().insert(self);
        response
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        TransactionError::from(self).into_response()
    }
}
