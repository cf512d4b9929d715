//! Route handlers.
//!
//! Every handler succeeds unconditionally; none of them read the request body
//! or query string.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::request::RequestId;
use crate::http::server::AppState;

/// Content type of the Prometheus text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Greeting returned by the catch-all handler.
pub const GREETING: &str = "Podinfo from scratch!";

/// Body of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// `/healthz`
pub async fn health(request_id: RequestId) -> Json<HealthStatus> {
    tracing::info!(request_id = %request_id, "Health check");
    Json(HealthStatus::healthy())
}

/// `/metrics`
pub async fn metrics(State(state): State<AppState>, request_id: RequestId) -> impl IntoResponse {
    tracing::info!(request_id = %request_id, "Metrics request");
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.metrics.snapshot(),
    )
}

/// Catch-all: echoes the correlation ID.
pub async fn root(request_id: RequestId) -> String {
    format!("{GREETING} Req ID: {request_id}")
}
