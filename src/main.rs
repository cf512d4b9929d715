//! podinfo-lite
//!
//! A minimal HTTP service exposing a health check, a metrics endpoint and a
//! catch-all echo endpoint.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ TraceLayer ─▶ correlation middleware ─▶ router
//!                                   (X-Request-ID, logs,        │
//!                                    http_requests_total)       ├─ /healthz  → {"status":"healthy"}
//!                                                               ├─ /metrics  → Prometheus text
//!                                                               └─ /*        → echo with request ID
//! ```

use std::path::PathBuf;

use clap::Parser;

use podinfo_lite::config;
use podinfo_lite::http::HttpServer;
use podinfo_lite::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "podinfo-lite")]
#[command(about = "Health, metrics and echo endpoints with request correlation", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port; takes precedence over the config file and PORT.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref(), cli.port)?;

    init_logging(&config.observability.log_filter);

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        record_actual_status = config.observability.record_actual_status,
        "podinfo-lite v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let server = HttpServer::new(config);
    let listener = match server.bind().await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Failed to bind listener");
            return Err(e.into());
        }
    };

    server.run(listener).await?;
    Ok(())
}
