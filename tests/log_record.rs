//! Transaction record scenarios built directly through the library API.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

use communication_logger::config::LoggerConfig;
use communication_logger::record::{CommunicationLogger, LogError, MemorySink};
use communication_logger::transaction::{
    TransactionContext, TransactionError, TransactionRequest, TransactionResponse,
};
use communication_logger::{Severity, TransactionLogger};

mod common;

fn logger(blacklist: &[&str]) -> (CommunicationLogger, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let config = LoggerConfig {
        blacklist: blacklist.iter().map(|field| field.to_string()).collect(),
        version: Some("1.0.0".to_string()),
        ..LoggerConfig::default()
    };
    (CommunicationLogger::with_sink(config, sink.clone()), sink)
}

#[test]
fn test_successful_json_post() {
    let (logger, sink) = logger(&[]);
    let context = common::json_post(r#"{"test":"123"}"#, 201, Some("100"));

    logger.log_data(Some(&context), None).unwrap();

    let records = sink.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.severity(), Severity::Information);
    assert_eq!(record.get("ElapsedMilliseconds"), Some(&json!(100)));
    assert_eq!(record.get("StatusCodeFamily"), Some(&json!("2XX")));
    assert_eq!(record.get("StatusDescription"), Some(&json!("Created")));
    assert_eq!(record.get("RequestBody"), Some(&json!({ "test": "123" })));
    assert_eq!(record.get("Query"), Some(&json!({ "source": "web" })));
    assert_eq!(record.get("QueryString"), Some(&json!("source=web")));
    assert_eq!(record.get("Port"), Some(&json!(8080)));
    assert_eq!(record.get("UrlBase"), Some(&json!("http://localhost:8080")));
    assert_eq!(record.get("Version"), Some(&json!("1.0.0")));
    assert_eq!(
        record.message(),
        "HTTP POST /orders from ?? responded 201 in 100 ms"
    );
}

#[test]
fn test_blacklisted_fields_are_masked() {
    let (logger, _) = logger(&["test"]);
    let context = common::json_post(r#"{"test":"123","test2":"123"}"#, 200, None);

    let record = logger.build_record(Some(&context), None).unwrap();

    assert_eq!(
        record.get("RequestBody"),
        Some(&json!({ "test": "******", "test2": "123" }))
    );
}

#[test]
fn test_unknown_client_address() {
    let (logger, _) = logger(&[]);
    let context = TransactionContext::new(TransactionRequest::new("GET", "http://localhost/"))
        .with_response(TransactionResponse::new(200));

    let record = logger.build_record(Some(&context), None).unwrap();

    assert_eq!(record.get("Ip"), Some(&json!("??")));
}

#[test]
fn test_error_without_timing() {
    let (logger, sink) = logger(&[]);
    let context = common::json_post("{}", 200, None);
    let error = TransactionError::unhandled(std::io::Error::other("database unavailable"));

    logger.log_data(Some(&context), Some(&error)).unwrap();

    let records = sink.records();
    let record = &records[0];
    assert_eq!(record.severity(), Severity::Error);
    assert_eq!(record.get("ElapsedMilliseconds"), Some(&json!(-1)));
    assert_eq!(record.get("StatusCode"), Some(&json!(500)));
    assert_eq!(record.get("IsSuccessful"), Some(&json!(false)));
    assert_eq!(record.get("ErrorMessage"), Some(&json!("database unavailable")));
    assert!(record
        .get("ErrorException")
        .and_then(Value::as_str)
        .is_some_and(|exception| exception.contains("database unavailable")));
}

#[test]
fn test_missing_context_is_rejected() {
    let (logger, sink) = logger(&[]);
    assert_eq!(logger.log_data(None, None), Err(LogError::ContextRequired));
    assert!(sink.is_empty());
}

#[test]
fn test_record_without_response() {
    let (logger, _) = logger(&[]);
    let context = TransactionContext::new(TransactionRequest::new("DELETE", "http://localhost/a"));

    let record = logger.build_record(Some(&context), None).unwrap();

    assert_eq!(record.get("StatusCode"), Some(&json!(0)));
    assert_eq!(record.get("StatusCodeFamily"), Some(&json!("0XX")));
    assert_eq!(record.get("ResponseHeaders"), Some(&Value::Null));
    assert_eq!(record.get("ResponseContent"), Some(&Value::Null));
    assert_eq!(record.get("ContentLength"), Some(&json!(0)));
}

#[test]
fn test_malformed_json_body_is_kept_verbatim() {
    let (logger, _) = logger(&["test"]);
    let context = common::json_post(r#"{"test": "#, 400, None);

    let record = logger.build_record(Some(&context), None).unwrap();

    assert_eq!(record.get("RequestBody"), Some(&json!(r#"{"test": "#)));
}

proptest! {
    #[test]
    fn prop_status_fields_agree(status in 100u16..600) {
        let (logger, _) = logger(&[]);
        let context = TransactionContext::new(TransactionRequest::new("GET", "http://localhost/"))
            .with_response(TransactionResponse::new(status));

        let record = logger.build_record(Some(&context), None).unwrap();

        prop_assert_eq!(record.get("IsSuccessful").cloned(), Some(json!(status < 400)));
        let family = format!("{}XX", status / 100);
        prop_assert_eq!(record.get("StatusCodeFamily").cloned(), Some(json!(family)));
        let expected = if status >= 500 { Severity::Error } else { Severity::Information };
        prop_assert_eq!(record.severity(), expected);
    }
}
