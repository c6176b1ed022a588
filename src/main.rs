//! Page gateway (v1)
//!
//! Serves web applications mounted under context paths.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (axum, request ID, limits, tracing)
//!                         │
//!                         ▼
//!                     dispatch::Dispatcher
//!                         │
//!         ┌───────────────┼──────────────────┬───────────────────┐
//!         ▼               ▼                  ▼                   ▼
//!     io::static      debug::console     filter chain       render engine
//!     resolver        (debug on)         (pages only)       (pages, fragments)
//!         │               │                  │                   │
//!         └───────────────┴─────────┬────────┴───────────────────┘
//!                                   ▼
//!     Client Response ◀──────── HttpResponse
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use page_gateway::config::{load_config, ServerConfig};
use page_gateway::lifecycle::{wait_for_signal, Shutdown};
use page_gateway::observability::{logging, metrics};
use page_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "page-gateway", version, about = "Serves web applications by context path")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable the debug console for every application.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if cli.debug {
        config.debug.enabled = true;
    }

    logging::init_logging(&config.observability);

    tracing::info!("page-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        apps = config.apps.len(),
        debug = config.debug.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let reason = wait_for_signal().await;
        shutdown.trigger(reason);
    });

    HttpServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
