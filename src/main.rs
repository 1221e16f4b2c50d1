//! Communication logger demo service.
//!
//! Hosts a handful of axum routes behind the communication log layer so every
//! request produces one structured transaction record.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ TraceLayer ──▶ CommunicationLogLayer ──▶ handler
//!                               │  before: stamp start + RequestKey
//!                               │  after:  stamp headers → log record
//!                               │  error:  stamp headers → translate / log error
//!                               ▼
//!                      CommunicationLogger ──▶ LogSink (tracing, target "communication_log")
//!                               │
//!                               └──▶ metrics (Prometheus, optional)
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use communication_logger::config::{load_config, ServiceConfig};
use communication_logger::http::HttpServer;
use communication_logger::lifecycle::Shutdown;
use communication_logger::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "communication-logger")]
#[command(about = "HTTP service that logs every transaction as one structured record", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        blacklist = config.communication_log.blacklist.len(),
        max_body_bytes = config.limits.max_body_bytes,
        max_response_bytes = config.limits.max_response_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signals = shutdown.clone();
    tokio::spawn(async move { signals.trigger_on_signal().await });

    HttpServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
