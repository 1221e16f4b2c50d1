//! Normalized field accessors over a transaction.

use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use serde_json::{Map, Value};

use crate::extract::body::{decode_request_body, decode_response_body, join_repeated};
use crate::extract::redaction::RedactionList;
use crate::transaction::{
    header_text, TransactionContext, TransactionError, TransactionRequest, TransactionResponse,
    ACCOUNT_ID, REQUEST_KEY, X_FORWARDED_FOR, X_INTERNAL_TIME,
};

/// Reported when neither a forwarded address nor a peer address is known.
pub const UNKNOWN_IP: &str = "??";

/// Reported when the elapsed time header is missing or unparsable.
pub const ELAPSED_UNAVAILABLE: i64 = -1;

/// Logged in place of a response body too large to buffer.
pub const UNBUFFERED_CONTENT: &str = "<unbuffered>";

/// Read-only view over a possibly absent transaction.
///
/// Every accessor returns a defined default when the context, request or
/// response is missing.
#[derive(Debug, Clone, Copy)]
pub struct TransactionView<'a> {
    context: Option<&'a TransactionContext>,
}

impl<'a> From<&'a TransactionContext> for TransactionView<'a> {
    fn from(context: &'a TransactionContext) -> Self {
        Self::new(Some(context))
    }
}

impl<'a> TransactionView<'a> {
    pub fn new(context: Option<&'a TransactionContext>) -> Self {
        Self { context }
    }

    fn request(&self) -> Option<&'a TransactionRequest> {
        self.context.and_then(|context| context.request.as_ref())
    }

    fn response(&self) -> Option<&'a TransactionResponse> {
        self.context.and_then(|context| context.response.as_ref())
    }

    /// 500 when an error is present, else the response status, else 0.
    pub fn status_code(&self, error: Option<&TransactionError>) -> u16 {
        if error.is_some() {
            return 500;
        }
        self.response().map_or(0, |response| response.status)
    }

    pub fn status_code_family(&self, error: Option<&TransactionError>) -> String {
        status_code_family(self.status_code(error))
    }

    /// First `X-Forwarded-For` address, else the peer address, else `"??"`.
    pub fn ip(&self) -> String {
        let Some(request) = self.request() else {
            return UNKNOWN_IP.to_string();
        };

        request
            .headers
            .as_ref()
            .and_then(|headers| headers.get(X_FORWARDED_FOR))
            .and_then(|forwarded| forwarded.to_str().ok())
            .and_then(|forwarded| forwarded.split(',').next())
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .or(request.user_host_address.as_deref())
            .unwrap_or(UNKNOWN_IP)
            .to_string()
    }

    /// Query parameters with repeated keys comma-joined.
    pub fn query(&self) -> Option<Map<String, Value>> {
        let request = self.request()?;
        Some(match &request.url {
            Some(url) => join_repeated(url.query_pairs()),
            None => Map::new(),
        })
    }

    /// Raw query string without the leading `?`.
    pub fn query_string(&self) -> Option<String> {
        let request = self.request()?;
        Some(
            request
                .url
                .as_ref()
                .and_then(|url| url.query())
                .unwrap_or_default()
                .to_string(),
        )
    }

    pub fn request_headers(&self) -> Option<Map<String, Value>> {
        let request = self.request()?;
        Some(request.headers.as_ref().map(header_map).unwrap_or_default())
    }

    pub fn response_headers(&self) -> Option<Map<String, Value>> {
        self.response()?.headers.as_ref().map(header_map)
    }

    /// Milliseconds from `X-Internal-Time`, or [`ELAPSED_UNAVAILABLE`].
    pub fn elapsed_milliseconds(&self) -> i64 {
        self.response_header(&X_INTERNAL_TIME)
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(ELAPSED_UNAVAILABLE)
    }

    pub fn request_key(&self) -> Option<String> {
        self.response_header(&REQUEST_KEY)
    }

    pub fn account_id(&self) -> Option<String> {
        self.response_header(&ACCOUNT_ID)
    }

    /// Decoded request body; `Null` without a request.
    pub fn request_body(&self, redaction: &RedactionList) -> Value {
        match self.request() {
            Some(request) => decode_request_body(
                request.body.as_deref(),
                &request.content_type(),
                redaction,
            ),
            None => Value::Null,
        }
    }

    /// Decoded response body; `Null` without a response.
    pub fn response_content(&self) -> Value {
        match self.response() {
            Some(response) if response.unbuffered => Value::String(UNBUFFERED_CONTENT.to_string()),
            Some(response) => decode_response_body(
                response.contents.as_deref(),
                response.content_type().as_deref(),
            ),
            None => Value::Null,
        }
    }

    /// Buffered body length, or the declared `Content-Length` of an unbuffered one.
    pub fn response_length(&self) -> u64 {
        let Some(response) = self.response() else {
            return 0;
        };

        match &response.contents {
            Some(contents) => contents.len() as u64,
            None if response.unbuffered => response
                .header(&header::CONTENT_LENGTH)
                .and_then(|length| length.trim().parse().ok())
                .unwrap_or(0),
            None => 0,
        }
    }

    pub fn method(&self) -> Option<String> {
        self.request().map(|request| request.method.clone())
    }

    pub fn path(&self) -> Option<String> {
        self.request()
            .and_then(|request| request.url.as_ref())
            .map(|url| url.path().to_string())
    }

    pub fn host(&self) -> Option<String> {
        self.request()
            .and_then(|request| request.url.as_ref())
            .and_then(|url| url.host_str())
            .map(str::to_string)
    }

    pub fn port(&self) -> Option<u16> {
        self.request()
            .and_then(|request| request.url.as_ref())
            .and_then(|url| url.port_or_known_default())
    }

    /// Scheme, host and port, e.g. `http://localhost:8080`.
    pub fn url_base(&self) -> Option<String> {
        self.request()
            .and_then(|request| request.url.as_ref())
            .map(|url| url.origin().ascii_serialization())
    }

    pub fn protocol_version(&self) -> Option<String> {
        self.request().map(|request| request.protocol_version.clone())
    }

    pub fn content_type(&self) -> Option<String> {
        self.response().and_then(TransactionResponse::content_type)
    }

    fn response_header(&self, name: &HeaderName) -> Option<String> {
        self.response().and_then(|response| response.header(name))
    }
}

fn header_map(headers: &HeaderMap) -> Map<String, Value> {
    join_repeated(
        headers
            .iter()
            .map(|(name, value)| (name.as_str(), header_text(value))),
    )
}

/// `"2XX"` for 201, `"0XX"` for an unknown status.
pub fn status_code_family(status_code: u16) -> String {
    let first = status_code.to_string().chars().next().unwrap_or('0');
    format!("{first}XX")
}

/// Canonical reason phrase, or `"Unknown"`.
pub fn status_description(status_code: u16) -> &'static str {
    StatusCode::from_u16(status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown")
}
