//! Error taxonomy for API operations.
//!
//! Handlers translate every failure into one of these variants; nothing
//! propagates unhandled to the transport layer. The mapping to HTTP status
//! codes and wire bodies lives in the `From<ApiError> for AppError` impl.

use devconnect_web::{AppError, FieldError};
use thiserror::Error;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Error taxonomy for the REST surface.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required fields, surfaced as a list. HTTP 400.
    #[error("{} validation error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Duplicate resource (already-registered email, already-liked post).
    /// HTTP 400, errors-list body.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A request that is well-formed but impossible (e.g. unliking a post
    /// that was never liked). HTTP 400.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing token or invalid credentials. HTTP 401.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid or expired token. HTTP 401 (kept at 401, not 403, to match
    /// the published API contract).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Authenticated, but not the owner of the target resource. HTTP 401.
    #[error("ownership violation: {0}")]
    OwnershipViolation(String),

    /// Referenced entity absent. HTTP 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// Unexpected backend failure. HTTP 500 with a generic message; the
    /// cause is logged and never leaked to the client.
    #[error("storage error: {0}")]
    Storage(#[from] RepoError),
}

impl ApiError {
    /// Convenience constructor for a single-field validation failure.
    #[must_use]
    pub fn invalid_field(param: &str, msg: &str) -> Self {
        Self::Validation(vec![FieldError::new(param, msg)])
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation(errors) => Self::validation(errors),
            ApiError::Conflict(msg) => Self::conflict(msg),
            ApiError::BadRequest(msg) => Self::bad_request(msg),
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::OwnershipViolation(msg) => Self::unauthorized(msg),
            ApiError::NotFound(msg) => Self::not_found(msg),
            ApiError::Storage(repo) => Self::internal(repo.into()),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        AppError::from(self).into_response()
    }
}

/// Failures reported by repository implementations.
///
/// Repositories know nothing about HTTP; these convert into
/// [`ApiError::Storage`] (or are matched explicitly where a variant has
/// handler-level meaning, e.g. [`RepoError::Duplicate`] at registration).
#[derive(Debug, Error)]
pub enum RepoError {
    /// Uniqueness constraint violated (e.g. email already registered).
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// Backend failure (lock poisoned, connection lost, ...).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Failures from the GitHub listing proxy.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The username has no GitHub profile (upstream 404).
    #[error("no GitHub profile found")]
    NotFound,

    /// Any other upstream failure.
    #[error("GitHub request failed: {0}")]
    Upstream(String),
}
