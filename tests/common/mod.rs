//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use communication_logger::config::{LoggerConfig, ServiceConfig};
use communication_logger::record::MemorySink;
use axum::http::{header, HeaderValue};
use communication_logger::transaction::{
    TransactionContext, TransactionRequest, TransactionResponse, X_INTERNAL_TIME,
};
use communication_logger::{HttpServer, LogRecord, Shutdown};

/// A running server with its captured records.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub sink: Arc<MemorySink>,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.sink.records()
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server on an ephemeral port, capturing records in memory.
#[allow(dead_code)]
pub async fn start_server(config: ServiceConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let sink = Arc::new(MemorySink::new());
    let server = HttpServer::with_sink(config, sink.clone());
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        sink,
        shutdown,
    }
}

#[allow(dead_code)]
pub fn config_with_blacklist(fields: &[&str]) -> ServiceConfig {
    ServiceConfig {
        communication_log: LoggerConfig {
            blacklist: fields.iter().map(|field| field.to_string()).collect(),
            ..LoggerConfig::default()
        },
        ..ServiceConfig::default()
    }
}

/// Non-pooled client that ignores proxy environment variables.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// JSON POST transaction with the given response status and timing header.
#[allow(dead_code)]
pub fn json_post(
    body: &'static str,
    status: u16,
    elapsed: Option<&'static str>,
) -> TransactionContext {
    let request = TransactionRequest::new("POST", "http://localhost:8080/orders?source=web")
        .with_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .with_body(body);

    let mut response = TransactionResponse::new(status);
    if let Some(elapsed) = elapsed {
        response = response.with_header(X_INTERNAL_TIME, HeaderValue::from_static(elapsed));
    }

    TransactionContext::new(request).with_response(response)
}
