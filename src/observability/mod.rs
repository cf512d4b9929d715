//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Correlation middleware produces:
//!     → logging.rs (structured log events keyed by request_id)
//!     → metrics.rs (request counters)
//!
//! Consumers:
//!     → stdout log aggregation
//!     → /metrics (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;

pub use self::metrics::{RequestLabels, RequestMetrics};
