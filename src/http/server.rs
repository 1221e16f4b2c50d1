//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the demo handlers
//! - Wire up middleware (tracing, communication log pipelines)
//! - Bind server to listener with client address info
//! - Stop on the shutdown broadcast

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::pipeline::{add_log_pipelines, CommunicationLogLayer, Pipelines};
use crate::record::{CommunicationLogger, LogSink, TransactionLogger};

/// HTTP server hosting the logged demo routes.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server that writes records to the default sink.
    pub fn new(config: ServiceConfig) -> Self {
        let logger = CommunicationLogger::new(config.communication_log.clone());
        Self::with_logger(config, Arc::new(logger))
    }

    /// Create a server that writes records to the given sink.
    pub fn with_sink(config: ServiceConfig, sink: Arc<dyn LogSink>) -> Self {
        let logger = CommunicationLogger::with_sink(config.communication_log.clone(), sink);
        Self::with_logger(config, Arc::new(logger))
    }

    pub fn with_logger(config: ServiceConfig, logger: Arc<dyn TransactionLogger>) -> Self {
        let mut pipelines = Pipelines::new();
        add_log_pipelines(&mut pipelines, logger, config.serialization);

        let router = Self::build_router(&config, pipelines);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, pipelines: Pipelines) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/echo", post(handlers::echo))
            .route("/accounts/{account_id}", post(handlers::update_account))
            .route("/errors/api", get(handlers::api_error))
            .route("/errors/unhandled", get(handlers::unhandled_error))
            .fallback(handlers::not_found)
            .layer(
                CommunicationLogLayer::new(pipelines)
                    .max_body_bytes(config.limits.max_body_bytes)
                    .max_response_bytes(config.limits.max_response_bytes),
            )
            .layer(TraceLayer::new_for_http())
    }

    /// The configured router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
