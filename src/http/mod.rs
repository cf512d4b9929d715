//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, TraceLayer)
//!     → middleware/correlation.rs (resolve request ID, log, count)
//!     → handlers.rs (/healthz, /metrics, catch-all echo)
//!     → Send to client (X-Request-ID echoed)
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use request::{RequestId, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
