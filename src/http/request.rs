//! Request correlation identifiers.
//!
//! # Responsibilities
//! - Read the inbound `X-Request-ID` header
//! - Generate a UUID v4 when the header is missing or empty
//! - Carry the resolved ID to handlers as a typed request extension
//!
//! The inbound value is kept as raw header bytes, so an ID that is not
//! valid UTF-8 is still propagated unchanged. Text renderings (logs, the
//! echo body) replace invalid sequences with U+FFFD.

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, HeaderName, HeaderValue, Request},
};
use uuid::Uuid;

/// Header carrying the correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Opaque per-request correlation identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(HeaderValue);

impl RequestId {
    /// Generate a fresh random (UUID v4) identifier.
    pub fn generate() -> Self {
        let id = Uuid::new_v4().hyphenated().to_string();
        Self(HeaderValue::from_str(&id).expect("hyphenated UUID is a valid header value"))
    }

    /// Take the ID from `X-Request-ID` if it is present and non-empty.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(&X_REQUEST_ID)
            .filter(|v| !v.is_empty())
            .map(|v| Self(v.clone()))
    }

    /// Propagate the inbound ID, or generate one.
    pub fn resolve(headers: &HeaderMap) -> Self {
        Self::from_headers(headers).unwrap_or_else(Self::generate)
    }

    /// The exact bytes of the ID.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The ID as text, with invalid UTF-8 replaced.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.0.as_bytes())
    }

    /// The ID as a header value, byte-for-byte what was received or generated.
    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// Access to the correlation ID attached by the middleware.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&RequestId>;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<&RequestId> {
        self.extensions().get::<RequestId>()
    }
}

/// Extracts the ID set by the correlation middleware, falling back to the
/// header (or a new ID) when a handler runs without it.
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<RequestId>() {
            return Ok(id.clone());
        }
        Ok(RequestId::resolve(&parts.headers))
    }
}
