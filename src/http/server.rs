//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, correlation)
//! - Bind the listener and serve connections

use std::net::SocketAddr;

use axum::{middleware, routing::any, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::middleware::correlation_middleware;
use crate::observability::metrics::RequestMetrics;

/// Errors from binding or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub metrics: RequestMetrics,
    pub record_actual_status: bool,
}

impl AppState {
    pub fn new(metrics: RequestMetrics, config: &ServiceConfig) -> Self {
        Self {
            metrics,
            record_actual_status: config.observability.record_actual_status,
        }
    }
}

/// HTTP server for the service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    metrics: RequestMetrics,
}

impl HttpServer {
    /// Create a new HTTP server with a fresh metrics registry.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_metrics(config, RequestMetrics::new())
    }

    /// Create a server that records into an existing registry.
    pub fn with_metrics(config: ServiceConfig, metrics: RequestMetrics) -> Self {
        let state = AppState::new(metrics.clone(), &config);
        let router = build_router(state);
        Self {
            router,
            config,
            metrics,
        }
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = self.config.listener.bind_address();
        TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Runs until the process is killed; there is no graceful shutdown.
    pub async fn run(self, listener: TcpListener) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn metrics(&self) -> &RequestMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
///
/// `/healthz` and `/metrics` match exactly; every other path, including `/`,
/// falls through to the echo handler.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", any(handlers::health))
        .route("/metrics", any(handlers::metrics))
        .fallback(handlers::root)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            correlation_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
