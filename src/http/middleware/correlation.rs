//! Correlation middleware.
//! Resolves the request ID, logs request start and completion, and counts
//! the request in the metrics registry.

use std::net::SocketAddr;
use std::time::Instant;

use percent_encoding::percent_decode_str;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::{RequestId, X_REQUEST_ID};
use crate::http::server::AppState;
use crate::observability::metrics::{RequestLabels, PLACEHOLDER_STATUS};

pub async fn correlation_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();

    let request_id = RequestId::resolve(req.headers());
    req.headers_mut()
        .insert(X_REQUEST_ID, request_id.header_value().clone());
    req.extensions_mut().insert(request_id.clone());

    let method = req.method().clone();
    let path = decoded_path(req.uri().path());
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        remote_addr = %remote_addr,
        "Request received"
    );

    let mut response = next.run(req).await;

    let status = if state.record_actual_status {
        response.status().as_u16().to_string()
    } else {
        PLACEHOLDER_STATUS.to_string()
    };
    state
        .metrics
        .increment(&RequestLabels::new(path.as_str(), method.as_str(), status));

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency = ?start.elapsed(),
        "Request completed"
    );

    response
        .headers_mut()
        .insert(X_REQUEST_ID, request_id.header_value().clone());
    response
}

/// Percent-decode the request path for logs and metric labels.
/// Invalid UTF-8 after decoding is replaced rather than rejected.
fn decoded_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
