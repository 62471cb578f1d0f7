//! Token, password, and avatar primitives.
//!
//! Signing and hashing are delegated to standard primitives: HS256 JWTs via
//! `jsonwebtoken` and Argon2id password hashes via `argon2`. Avatar URLs are
//! Gravatar links keyed by the SHA-256 of the normalized email.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::models::UserId;

/// JWT claims carried by every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id.
    pub sub: UserId,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Issued-at (unix seconds).
    pub iat: i64,
}

impl Claims {
    /// Claims for a freshly authenticated user.
    #[must_use]
    pub fn new(user_id: UserId, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Sign a token for the given user.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] when encoding fails (an empty secret is
/// rejected by configuration loading before this point).
pub fn mint_token(user_id: UserId, secret: &str, ttl_secs: i64) -> Result<String, ApiError> {
    let claims = Claims::new(user_id, ttl_secs);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Storage(crate::error::RepoError::Backend(format!("jwt encode: {e}"))))
}

/// Verify a token's signature and expiry, returning the authenticated user.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] for any invalid or expired token.
pub fn verify_token(token: &str, secret: &str) -> Result<UserId, ApiError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Forbidden("Token is not valid".to_string()))?;

    Ok(data.claims.sub)
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            ApiError::Storage(crate::error::RepoError::Backend(format!(
                "password hash: {e}"
            )))
        })
}

/// Check a candidate password against a stored PHC-format hash.
///
/// Malformed stored hashes verify as false rather than erroring; a user
/// record with a corrupt hash must not become a login oracle.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Deterministic Gravatar URL for an email address.
///
/// Normalizes (trim + lowercase) and hashes with SHA-256, sized 200px,
/// PG-rated, with the "mystery person" default - the same parameters the
/// web client expects.
#[must_use]
pub fn gravatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("https://www.gravatar.com/avatar/{hex}?s=200&r=pg&d=mm")
}
