//! Structured logging.
//!
//! # Design Decisions
//! - Uses the tracing crate; every request-scoped event carries a
//!   `request_id` field
//! - `RUST_LOG` wins over the configured filter

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `fallback_filter` is used when `RUST_LOG` is unset or unparsable.
pub fn init_logging(fallback_filter: &str) {
    tracing_subscriber::registry()
        .with(build_filter(fallback_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_filter(fallback_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_filter))
}
