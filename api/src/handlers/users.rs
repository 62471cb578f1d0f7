//! User registration handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use devconnect_web::FieldError;
use serde::{Deserialize, Serialize};

use crate::auth::{gravatar_url, hash_password, mint_token};
use crate::environment::ApiEnvironment;
use crate::error::{ApiError, RepoError};
use crate::handlers::is_valid_email;
use crate::models::{User, UserId};
use crate::providers::{GithubClient, PostRepository, ProfileRepository, UserRepository};

/// Registration request body.
///
/// Fields are optional at the serde layer so that missing values surface as
/// validation entries rather than body-rejection errors.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Display name. Required.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address. Required, must be unique.
    #[serde(default)]
    pub email: Option<String>,
    /// Password, minimum 6 characters.
    #[serde(default)]
    pub password: Option<String>,
}

/// Response carrying a freshly signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed bearer token.
    pub token: String,
}

fn validate(body: &RegisterRequest) -> Result<(String, String, String), ApiError> {
    let mut errors = Vec::new();

    let name = body.name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is empty"));
    }

    let email = body.email.as_deref().unwrap_or("").trim().to_string();
    if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Enter valid email"));
    }

    let password = body.password.clone().unwrap_or_default();
    if password.chars().count() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password should be minimum 6 characters",
        ));
    }

    if errors.is_empty() {
        Ok((name, email, password))
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// `POST /api/users` - register a new account.
///
/// ```text
/// POST /api/users
/// Content-Type: application/json
///
/// { "name": "A", "email": "a@x.com", "password": "secret1" }
/// ```
///
/// Returns `{"token": "<jwt>"}` on success. A duplicate email fails with
/// 400 `{"errors":[{"msg":"User already exists"}]}` and creates nothing.
pub async fn register<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let (name, email, password) = validate(&body)?;

    if env.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let user = User {
        id: UserId::new(),
        name,
        avatar: gravatar_url(&email),
        email,
        password_hash: hash_password(&password)?,
        created_at: Utc::now(),
    };

    let user = env.users.insert(user).await.map_err(|e| match e {
        RepoError::Duplicate(_) => ApiError::Conflict("User already exists".to_string()),
        other => ApiError::Storage(other),
    })?;

    tracing::info!(user_id = %user.id, "user registered");

    let token = mint_token(user.id, &env.config.jwt_secret, env.config.token_ttl_secs)?;
    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn valid_body_passes() {
        assert!(validate(&body("A", "a@x.com", "secret1")).is_ok());
    }

    #[test]
    fn all_failures_are_collected() {
        let err = validate(&RegisterRequest {
            name: None,
            email: Some("nope".to_string()),
            password: Some("short".to_string()),
        });
        match err {
            Err(ApiError::Validation(errors)) => {
                assert_eq!(errors.len(), 3);
                let params: Vec<_> = errors.iter().filter_map(|e| e.param.as_deref()).collect();
                assert_eq!(params, vec!["name", "email", "password"]);
            }
            other => unreachable!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(validate(&body("   ", "a@x.com", "secret1")).is_err());
    }
}
