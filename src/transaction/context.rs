//! Per-request transaction context.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use std::borrow::Cow;
use url::Url;

use crate::transaction::items::TransactionItems;

/// Everything the logger knows about one request/response pair.
///
/// Owned by the host for the lifetime of the request. Hooks borrow it
/// mutably, extractors borrow it immutably; nothing keeps a reference after
/// the call returns.
#[derive(Debug, Clone, Default)]
pub struct TransactionContext {
    pub request: Option<TransactionRequest>,
    pub response: Option<TransactionResponse>,
    pub items: TransactionItems,
}

impl TransactionContext {
    pub fn new(request: TransactionRequest) -> Self {
        Self {
            request: Some(request),
            response: None,
            items: TransactionItems::default(),
        }
    }

    pub fn with_response(mut self, response: TransactionResponse) -> Self {
        self.response = Some(response);
        self
    }
}

/// Inbound request as seen by the logger.
#[derive(Debug, Clone)]
pub struct TransactionRequest {
    /// HTTP method, upper case.
    pub method: String,
    /// Absolute request URL. `None` when the host could not produce one.
    pub url: Option<Url>,
    pub headers: Option<HeaderMap>,
    /// Buffered body. Cloning is cheap and leaves the host's copy intact.
    pub body: Option<Bytes>,
    /// Peer address reported by the host.
    pub user_host_address: Option<String>,
    /// Protocol version, e.g. "1.1" or "2".
    pub protocol_version: String,
}

impl TransactionRequest {
    /// Create a request; an unparsable URL is kept as `None`.
    pub fn new(method: impl Into<String>, url: &str) -> Self {
        Self {
            method: method.into(),
            url: Url::parse(url).ok(),
            headers: Some(HeaderMap::new()),
            body: None,
            user_host_address: None,
            protocol_version: "1.1".to_string(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Append one header value, keeping earlier values of the same name.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers
            .get_or_insert_with(HeaderMap::new)
            .append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_user_host_address(mut self, address: impl Into<String>) -> Self {
        self.user_host_address = Some(address.into());
        self
    }

    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    /// All `Content-Type` values joined with `;`, or an empty string.
    pub fn content_type(&self) -> String {
        self.headers
            .as_ref()
            .map(|headers| {
                headers
                    .get_all(header::CONTENT_TYPE)
                    .iter()
                    .map(header_text)
                    .collect::<Vec<_>>()
                    .join(";")
            })
            .unwrap_or_default()
    }
}

/// Outbound response as seen by the logger.
#[derive(Debug, Clone)]
pub struct TransactionResponse {
    pub status: u16,
    /// Headers as the host produced them, plus whatever the hooks stamped.
    pub headers: Option<HeaderMap>,
    /// Fully materialized response body.
    pub contents: Option<Bytes>,
    /// The body went to the client without being buffered; `contents` is empty.
    pub unbuffered: bool,
}

impl Default for TransactionResponse {
    fn default() -> Self {
        Self::new(200)
    }
}

impl TransactionResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Some(HeaderMap::new()),
            contents: None,
            unbuffered: false,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Set a header, replacing any existing values.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers_mut().insert(name, value);
        self
    }

    pub fn with_content_type(self, content_type: HeaderValue) -> Self {
        self.with_header(header::CONTENT_TYPE, content_type)
    }

    pub fn with_contents(mut self, contents: impl Into<Bytes>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Header collection, created on first use.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        self.headers.get_or_insert_with(HeaderMap::new)
    }

    /// First value of a header as text.
    pub fn header(&self, name: &HeaderName) -> Option<String> {
        self.headers
            .as_ref()
            .and_then(|headers| headers.get(name))
            .map(|value| header_text(value).into_owned())
    }

    pub fn content_type(&self) -> Option<String> {
        self.header(&header::CONTENT_TYPE)
    }
}

/// Header value as text; bytes outside UTF-8 become replacement characters.
pub fn header_text(value: &HeaderValue) -> Cow<'_, str> {
    String::from_utf8_lossy(value.as_bytes())
}
