//! Error types for web handlers.
//!
//! This module defines error types that bridge between domain errors
//! and HTTP responses, implementing Axum's `IntoResponse` trait.
//!
//! Two wire shapes exist, matching the API contract:
//!
//! - validation-style failures: `{"errors": [{"msg": "...", "param": "..."}]}`
//! - everything else: `{"msg": "..."}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

/// One entry in a validation error list.
///
/// Mirrors the `{msg, param}` objects clients iterate over to raise one
/// alert per failed field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    /// Human-readable message for this field.
    pub msg: String,
    /// The offending field, when the failure is tied to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl FieldError {
    /// A field-scoped validation message.
    #[must_use]
    pub fn new(param: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: Some(param.into()),
        }
    }

    /// A validation message with no associated field (e.g. a conflict).
    #[must_use]
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: None,
        }
    }
}

/// Which wire shape the error body takes.
#[derive(Debug)]
enum Body {
    /// `{"errors": [...]}`
    Errors(Vec<FieldError>),
    /// `{"msg": "..."}`
    Message(String),
}

/// Application error type for web handlers.
///
/// Wraps a status code and a wire body, with an optional internal source
/// that is logged but never exposed to clients.
///
/// # Examples
///
/// ```ignore
/// async fn handler() -> Result<Json<Post>, AppError> {
///     let post = repo.get(id).await
///         .map_err(|_| AppError::not_found("Post not found"))?;
///     Ok(Json(post))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Wire body
    body: Body,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a 400 Bad Request error with a `{"msg"}` body.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: Body::Message(message.into()),
            source: None,
        }
    }

    /// Create a 400 validation failure carrying a `{"errors": [...]}` body.
    #[must_use]
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: Body::Errors(errors),
            source: None,
        }
    }

    /// Create a 400 conflict (duplicate resource) with an errors-list body.
    ///
    /// The contract reports conflicts at 400 with the same list shape as
    /// validation failures, so clients can reuse their alert fan-out.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: Body::Errors(vec![FieldError::message(message)]),
            source: None,
        }
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: Body::Message(message.into()),
            source: None,
        }
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: Body::Message(message.into()),
            source: None,
        }
    }

    /// Create a 500 Internal Server Error with the generic client message.
    ///
    /// The real cause goes into `source` for logging; clients only ever see
    /// "Server Error".
    #[must_use]
    pub fn internal(source: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Body::Message("Server Error".to_string()),
            source: Some(source),
        }
    }

    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Body::Message(msg) => write!(f, "[{}] {}", self.status, msg),
            Body::Errors(errors) => {
                write!(f, "[{}] {} validation error(s)", self.status, errors.len())
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[derive(Serialize)]
struct ErrorsBody<'a> {
    errors: &'a [FieldError],
}

#[derive(Serialize)]
struct MessageBody<'a> {
    msg: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors with their masked cause
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => {
                    tracing::error!(status = %self.status, error = %source, "Internal server error");
                }
                None => {
                    tracing::error!(status = %self.status, "Internal server error");
                }
            }
        }

        match self.body {
            Body::Errors(errors) => {
                (self.status, Json(ErrorsBody { errors: &errors })).into_response()
            }
            Body::Message(msg) => (self.status, Json(MessageBody { msg: &msg })).into_response(),
        }
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[400 Bad Request] Invalid input");
    }

    #[test]
    fn test_validation_carries_field_errors() {
        let err = AppError::validation(vec![
            FieldError::new("name", "Name is empty"),
            FieldError::new("email", "Enter valid email"),
        ]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "[400 Bad Request] 2 validation error(s)");
    }

    #[test]
    fn test_conflict_is_400_with_errors_shape() {
        let err = AppError::conflict("User already exists");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        match err.body {
            Body::Errors(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].msg, "User already exists");
                assert!(errors[0].param.is_none());
            }
            Body::Message(_) => unreachable!("conflict must use the errors shape"),
        }
    }

    #[test]
    fn test_internal_masks_cause() {
        let err = AppError::internal(anyhow::anyhow!("connection refused"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        match &err.body {
            Body::Message(msg) => assert_eq!(msg, "Server Error"),
            Body::Errors(_) => unreachable!("internal must use the message shape"),
        }
    }

    #[test]
    fn test_field_error_serialization_skips_missing_param() {
        let json = serde_json::to_value(FieldError::message("oops")).unwrap_or_default();
        assert_eq!(json, serde_json::json!({"msg": "oops"}));
    }
}
