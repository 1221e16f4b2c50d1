//! Timing and correlation stamping.
//!
//! # Responsibilities
//! - Start the stopwatch and settle the request key before the handler runs
//! - Write `X-Internal-Time`, `RequestKey` and `AccountId` on the way out
//!
//! # Design Decisions
//! - An incoming non-blank `RequestKey` header is reused; otherwise a UUID v4 is generated
//! - Stamping creates a default response when the host has none yet (error path)
//! - The stopwatch is consumed on first stamp, so a second stamp keeps the first time

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use crate::pipeline::hooks::Pipelines;
use crate::transaction::{
    TransactionContext, TransactionResponse, ACCOUNT_ID, REQUEST_KEY, X_INTERNAL_TIME,
};

/// Pre-request hook: remember the request key and start timing.
pub fn write_stopwatch_and_request_key(
    context: &mut TransactionContext,
) -> Option<TransactionResponse> {
    let request_key = context
        .request
        .as_ref()
        .and_then(|request| request.headers.as_ref())
        .and_then(|headers| headers.get(REQUEST_KEY))
        .and_then(|key| key.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    context.items.request_key = Some(request_key);
    context.items.start_stopwatch();
    None
}

/// Post-request and on-error hook: stamp timing and correlation headers.
pub fn read_stopwatch_and_request_key(context: &mut TransactionContext) {
    let items = &mut context.items;
    let headers = context
        .response
        .get_or_insert_with(TransactionResponse::default)
        .headers_mut();

    if let Some(elapsed) = items.stop_stopwatch() {
        headers.insert(X_INTERNAL_TIME, HeaderValue::from(elapsed));
    }

    if let Some(request_key) = &items.request_key {
        insert_text(headers, REQUEST_KEY, request_key);
    }

    if let Some(account_id) = &items.account_id {
        insert_text(headers, ACCOUNT_ID, account_id);
    }
}

fn insert_text(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => tracing::debug!(header = %name, "Skipping value not valid in a header"),
    }
}

/// Register the stamping hooks at the start of each list.
pub fn add_stopwatch_and_request_key_pipelines(pipelines: &mut Pipelines) {
    pipelines
        .before_request
        .add_to_start(write_stopwatch_and_request_key);
    pipelines
        .after_request
        .add_to_start(read_stopwatch_and_request_key);
    pipelines.on_error.add_to_start(|context, _| {
        read_stopwatch_and_request_key(context);
        None
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionRequest;

    fn request_with_key(key: &'static str) -> TransactionRequest {
        TransactionRequest::new("GET", "http://localhost/test")
            .with_header(REQUEST_KEY, HeaderValue::from_static(key))
    }

    #[test]
    fn test_incoming_request_key_is_reused() {
        let mut context = TransactionContext::new(request_with_key("abc-123"));
        assert!(write_stopwatch_and_request_key(&mut context).is_none());

        assert_eq!(context.items.request_key.as_deref(), Some("abc-123"));
        assert!(context.items.stopwatch.is_some());
    }

    #[test]
    fn test_blank_request_key_is_replaced() {
        let mut context = TransactionContext::new(request_with_key("  "));
        write_stopwatch_and_request_key(&mut context);

        let key = context.items.request_key.clone().unwrap();
        assert!(Uuid::parse_str(&key).is_ok());
    }

    #[test]
    fn test_generated_without_request() {
        let mut context = TransactionContext::default();
        write_stopwatch_and_request_key(&mut context);
        assert!(context.items.request_key.is_some());
    }

    #[test]
    fn test_stamp_creates_response_and_headers() {
        let mut context = TransactionContext::new(request_with_key("abc-123"));
        write_stopwatch_and_request_key(&mut context);
        context.items.account_id = Some("acc-1".to_string());

        read_stopwatch_and_request_key(&mut context);

        let response = context.response.as_ref().unwrap();
        let headers = response.headers.as_ref().unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(headers[REQUEST_KEY], "abc-123");
        assert_eq!(headers[ACCOUNT_ID], "acc-1");
        assert!(headers[X_INTERNAL_TIME].to_str().unwrap().parse::<u64>().is_ok());
        assert!(context.items.stopwatch.is_none());
    }

    #[test]
    fn test_account_id_with_control_characters_is_skipped() {
        let mut context = TransactionContext::default();
        context.items.account_id = Some("acc\n1".to_string());
        read_stopwatch_and_request_key(&mut context);

        let headers = context.response.as_ref().unwrap().headers.as_ref().unwrap();
        assert!(!headers.contains_key(ACCOUNT_ID));
    }

    #[test]
    fn test_stamp_without_stopwatch_skips_time() {
        let mut context = TransactionContext::default();
        read_stopwatch_and_request_key(&mut context);

        let headers = context.response.as_ref().unwrap().headers.as_ref().unwrap();
        assert!(!headers.contains_key(X_INTERNAL_TIME));
        assert!(!headers.contains_key(REQUEST_KEY));
    }

    #[test]
    fn test_registration_positions() {
        let mut pipelines = Pipelines::new();
        pipelines.after_request.add_to_end(|context| {
            let stamped = context
                .response
                .as_ref()
                .and_then(|response| response.headers.as_ref())
                .is_some_and(|headers| headers.contains_key(REQUEST_KEY));
            context.items.add_info("stamped_before_me", stamped);
        });
        add_stopwatch_and_request_key_pipelines(&mut pipelines);

        assert_eq!(pipelines.before_request.len(), 1);
        assert_eq!(pipelines.after_request.len(), 2);
        assert_eq!(pipelines.on_error.len(), 1);

        let mut context = TransactionContext::new(request_with_key("k"));
        pipelines.invoke_before_request(&mut context);
        pipelines.invoke_after_request(&mut context);
        assert_eq!(context.items.additional_info["stamped_before_me"], true);
    }
}
