//! Custom Axum extractors.
//!
//! Currently just [`CorrelationId`], which reads the id injected by the
//! correlation middleware (or the `X-Correlation-ID` header directly when
//! the middleware is not installed).

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::middleware::CORRELATION_ID_HEADER;

/// Correlation ID for request tracing.
///
/// Prefers the id stored in request extensions by
/// [`crate::middleware::correlation_id_layer`], then the
/// `X-Correlation-ID` header, then generates a fresh UUID v4.
///
/// # Example
///
/// ```ignore
/// async fn handler(correlation_id: CorrelationId) -> String {
///     format!("Request ID: {}", correlation_id.0)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Uuid>() {
            return Ok(Self(*id));
        }

        let correlation_id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}
