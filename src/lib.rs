//! Minimal podinfo-style service: health check, Prometheus metrics and a
//! correlation-ID echo endpoint.

pub mod config;
pub mod http;
pub mod observability;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use observability::metrics::RequestMetrics;
