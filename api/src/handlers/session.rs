//! Login and current-identity handlers (the `/api/auth` pair).

use std::sync::Arc;

use axum::{extract::State, Json};
use devconnect_web::FieldError;
use serde::Deserialize;

use crate::auth::{mint_token, verify_password};
use crate::environment::ApiEnvironment;
use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::handlers::{is_valid_email, present};
use crate::handlers::users::TokenResponse;
use crate::models::UserView;
use crate::providers::{GithubClient, PostRepository, ProfileRepository, UserRepository};

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Registered email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Account password.
    #[serde(default)]
    pub password: Option<String>,
}

fn validate(body: &LoginRequest) -> Result<(String, String), ApiError> {
    let mut errors = Vec::new();

    let email = body.email.as_deref().unwrap_or("").trim().to_string();
    if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Please include a valid email"));
    }

    if !present(body.password.as_ref()) {
        errors.push(FieldError::new("password", "Password is required"));
    }

    if errors.is_empty() {
        Ok((email, body.password.clone().unwrap_or_default()))
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// `POST /api/auth` - authenticate and receive a token.
///
/// ```text
/// POST /api/auth
/// Content-Type: application/json
///
/// { "email": "a@x.com", "password": "secret1" }
/// ```
///
/// Unknown email and wrong password fail identically with 401
/// `{"msg":"Invalid credentials"}` - the response must not reveal which
/// half was wrong.
pub async fn login<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let (email, password) = validate(&body)?;

    let user = env
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !verify_password(&password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    tracing::info!(user_id = %user.id, "user logged in");

    let token = mint_token(user.id, &env.config.jwt_secret, env.config.token_ttl_secs)?;
    Ok(Json(TokenResponse { token }))
}

/// `GET /api/auth` - the identity behind the presented token.
///
/// Returns the user record without the password hash.
pub async fn current_user<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
) -> Result<Json<UserView>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let user = env
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.view()))
}
