//! Tower layer running [`Pipelines`] around an axum service.
//!
//! # Responsibilities
//! - Buffer the request body once and hand the handler a copy of the same bytes
//! - Build the transaction context from the HTTP request
//! - Run before hooks, the handler, then after or on-error hooks
//! - Turn the final transaction response back into an HTTP response
//!
//! # Data Flow
//! ```text
//! Request<Body>
//!     → buffer body (limit) → TransactionContext
//!     → before hooks ── short-circuit? ──────────────┐
//!     → inner service                                │
//!         Ok(response, no error) → after hooks ◀─────┘
//!         error extension / Err   → on-error hooks
//!     → Response<Body>
//! ```
//!
//! # Design Decisions
//! - The service never fails; handler errors become responses
//! - Response headers and extensions reach the client exactly as the handler set them
//! - Responses up to the limit are buffered so they can be logged; larger or
//!   unsized ones stream through and are logged without their body
//! - `Content-Length` and `Transfer-Encoding` are recomputed for rebuilt bodies

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::ConnectInfo,
    http::{header, request::Parts, Request, Response, StatusCode, Version},
};
use http_body_util::LengthLimitError;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service, ServiceExt};

use crate::pipeline::hooks::Pipelines;
use crate::pipeline::markers::{apply_response_markers, CorrelationKey};
use crate::transaction::{
    ApiError, TransactionContext, TransactionError, TransactionRequest, TransactionResponse,
};

/// Largest request body buffered when no limit is configured.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Largest response body buffered for logging when no limit is configured.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 2 * 1024 * 1024;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

#[derive(Clone, Copy, Debug)]
struct Limits {
    request: usize,
    response: usize,
}

#[derive(Clone, Debug)]
pub struct CommunicationLogLayer {
    pipelines: Arc<Pipelines>,
    limits: Limits,
}

impl CommunicationLogLayer {
    pub fn new(pipelines: Pipelines) -> Self {
        Self {
            pipelines: Arc::new(pipelines),
            limits: Limits {
                request: DEFAULT_MAX_BODY_BYTES,
                response: DEFAULT_MAX_RESPONSE_BYTES,
            },
        }
    }

    /// Requests declaring or sending more than `limit` bytes get 413.
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.limits.request = limit;
        self
    }

    /// Responses larger than `limit` bytes are sent without being buffered.
    pub fn max_response_bytes(mut self, limit: usize) -> Self {
        self.limits.response = limit;
        self
    }
}

impl<S> Layer<S> for CommunicationLogLayer {
    type Service = CommunicationLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CommunicationLogService {
            inner,
            pipelines: self.pipelines.clone(),
            limits: self.limits,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CommunicationLogService<S> {
    inner: S,
    pipelines: Arc<Pipelines>,
    limits: Limits,
}

impl<S> Service<Request<Body>> for CommunicationLogService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        // `oneshot` waits for the clone to become ready before calling it.
        let inner = self.inner.clone();
        let pipelines = self.pipelines.clone();
        let limits = self.limits;

        Box::pin(async move { Ok(run_transaction(inner, pipelines, limits, request).await) })
    }
}

async fn run_transaction<S>(
    inner: S,
    pipelines: Arc<Pipelines>,
    limits: Limits,
    request: Request<Body>,
) -> Response<Body>
where
    S: Service<Request<Body>, Response = Response<Body>> + Send,
    S::Future: Send,
    S::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (mut parts, body) = request.into_parts();
    let buffered = buffer_body(&parts, body, limits.request).await;

    let mut context = TransactionContext::new(transaction_request(
        &parts,
        buffered.as_ref().ok().cloned(),
    ));

    if let Some(response) = pipelines.invoke_before_request(&mut context) {
        tracing::debug!(status = response.status, "Before-request hook answered");
        context.response = Some(response);
        pipelines.invoke_after_request(&mut context);
        return into_http_response(context.response.take().unwrap_or_default(), None);
    }

    let bytes = match buffered {
        Ok(bytes) => bytes,
        Err(error) => return fail(&pipelines, &mut context, error),
    };

    if let Some(request_key) = &context.items.request_key {
        parts
            .extensions
            .insert(CorrelationKey(request_key.clone()));
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    let response = match inner.oneshot(request).await {
        Ok(response) => response,
        Err(error) => {
            let error = TransactionError::from_boxed(error.into());
            return fail(&pipelines, &mut context, error);
        }
    };

    let (mut parts, body) = response.into_parts();
    apply_response_markers(&mut parts.extensions, &mut context.items);

    if let Some(error) = parts.extensions.remove::<TransactionError>() {
        return fail(&pipelines, &mut context, error);
    }

    let mut transaction = TransactionResponse::new(parts.status.as_u16())
        .with_headers(std::mem::take(&mut parts.headers));

    let fits = body
        .size_hint()
        .upper()
        .is_some_and(|upper| upper <= limits.response as u64);
    let passthrough = if fits {
        match axum::body::to_bytes(body, limits.response).await {
            Ok(contents) => {
                transaction.contents = Some(contents);
                None
            }
            Err(error) => {
                tracing::warn!(error = %error, "Failed to read response body");
                return fail(&pipelines, &mut context, TransactionError::unhandled(error));
            }
        }
    } else {
        tracing::debug!(
            limit = limits.response,
            "Response body exceeds the buffering limit, logging without it"
        );
        transaction.unbuffered = true;
        Some(body)
    };

    context.response = Some(transaction);
    pipelines.invoke_after_request(&mut context);

    let mut http = into_http_response(context.response.take().unwrap_or_default(), passthrough);
    *http.extensions_mut() = parts.extensions;
    http
}

/// Run the on-error hooks; without a replacement the host answers 500 with
/// whatever headers the hooks stamped.
fn fail(
    pipelines: &Pipelines,
    context: &mut TransactionContext,
    error: TransactionError,
) -> Response<Body> {
    context.response = None;

    if let Some(response) = pipelines.invoke_on_error(context, &error) {
        return into_http_response(response, None);
    }

    tracing::debug!(error = %error, "Unhandled transaction error");
    let mut fallback = context.response.take().unwrap_or_default();
    fallback.status = StatusCode::INTERNAL_SERVER_ERROR.as_u16();
    fallback.headers_mut().remove(header::CONTENT_TYPE);
    fallback.contents = None;
    into_http_response(fallback, None)
}

async fn buffer_body(parts: &Parts, body: Body, limit: usize) -> Result<Bytes, TransactionError> {
    let declared = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if declared.is_some_and(|length| length > limit) {
        return Err(ApiError::payload_too_large().into());
    }

    axum::body::to_bytes(body, limit).await.map_err(|error| {
        let source = error.into_inner();
        if source.is::<LengthLimitError>() {
            return TransactionError::from(ApiError::payload_too_large());
        }
        tracing::warn!(error = %source, "Failed to read request body");
        TransactionError::from(ApiError::bad_request())
    })
}

fn transaction_request(parts: &Parts, body: Option<Bytes>) -> TransactionRequest {
    let mut request = TransactionRequest::new(parts.method.as_str(), &absolute_url(parts))
        .with_headers(parts.headers.clone())
        .with_protocol_version(protocol_version(parts.version));
    request.body = body;

    if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
        request = request.with_user_host_address(addr.ip().to_string());
    }

    request
}

/// Server-side request URIs are usually origin-form; rebuild the absolute URL
/// from the `Host` header.
fn absolute_url(parts: &Parts) -> String {
    let scheme = parts.uri.scheme_str().unwrap_or("http");
    let host = parts
        .uri
        .authority()
        .map(|authority| authority.as_str().to_string())
        .or_else(|| {
            parts
                .headers
                .get(header::HOST)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "localhost".to_string());
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|path| path.as_str())
        .unwrap_or("/");

    format!("{scheme}://{host}{path_and_query}")
}

fn protocol_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

/// `passthrough` is the handler's own body when it was too large to buffer.
fn into_http_response(response: TransactionResponse, passthrough: Option<Body>) -> Response<Body> {
    let mut headers = response.headers.unwrap_or_default();
    let body = match passthrough {
        Some(body) => body,
        None => {
            headers.remove(header::CONTENT_LENGTH);
            headers.remove(header::TRANSFER_ENCODING);
            Body::from(response.contents.unwrap_or_default())
        }
    };

    let mut http = Response::new(body);
    *http.status_mut() =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    *http.headers_mut() = headers;
    http
}
