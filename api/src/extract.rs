//! Authenticated-user extractor.
//!
//! The auth guard for every protected route: pulls the bearer token from
//! the request, verifies signature and expiry against the shared secret,
//! and yields the decoded identity. Stateless; no side effects.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use crate::auth::verify_token;
use crate::environment::ApiEnvironment;
use crate::error::ApiError;
use crate::models::UserId;
use crate::providers::{GithubClient, PostRepository, ProfileRepository, UserRepository};

/// Authenticated identity extracted from a verified token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The authenticated user.
    pub user_id: UserId,
}

/// Pull the token out of the request headers.
///
/// Accepts `Authorization: Bearer <token>` and the legacy `x-auth-token`
/// header the original web client sends.
fn token_from_headers(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(value) = headers.get("authorization") {
        let value = value
            .to_str()
            .map_err(|_| ApiError::Unauthorized("No token, authorization denied".to_string()))?;
        if let Some(token) = value.strip_prefix("Bearer ") {
            if !token.trim().is_empty() {
                return Ok(token.trim().to_string());
            }
        }
    }

    if let Some(value) = headers.get("x-auth-token") {
        if let Ok(token) = value.to_str() {
            if !token.trim().is_empty() {
                return Ok(token.trim().to_string());
            }
        }
    }

    Err(ApiError::Unauthorized(
        "No token, authorization denied".to_string(),
    ))
}

#[async_trait]
impl<U, P, B, G> FromRequestParts<Arc<ApiEnvironment<U, P, B, G>>> for AuthUser
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiEnvironment<U, P, B, G>>,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers)?;
        let user_id = verify_token(&token, &state.config.jwt_secret)?;
        Ok(Self { user_id })
    }
}
