//! API configuration.
//!
//! Plain data loaded from the environment with development defaults, then
//! injected into the handler environment. No global singleton.

use std::env;

/// GitHub proxy configuration.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Base URL of the GitHub API (overridable for tests).
    pub api_base: String,
    /// OAuth app client id, appended to repo-listing requests when set.
    pub client_id: Option<String>,
    /// OAuth app client secret, appended alongside `client_id`.
    pub client_secret: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            client_id: None,
            client_secret: None,
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address the server binds to.
    pub bind_addr: String,
    /// Shared secret for token signing and verification.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// GitHub proxy settings.
    pub github: GithubConfig,
}

impl ApiConfig {
    /// Development defaults: local bind, one-hour tokens.
    #[must_use]
    pub fn development() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            jwt_secret: "devconnect-dev-secret".to_string(),
            token_ttl_secs: 3600,
            github: GithubConfig::default(),
        }
    }

    /// Load configuration from `DEVCONNECT_*` environment variables,
    /// falling back to development defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::development();

        if let Ok(v) = env::var("DEVCONNECT_BIND_ADDR") {
            config.bind_addr = v;
        }
        if let Ok(v) = env::var("DEVCONNECT_JWT_SECRET") {
            if !v.is_empty() {
                config.jwt_secret = v;
            }
        }
        if let Ok(v) = env::var("DEVCONNECT_TOKEN_TTL_SECS") {
            config.token_ttl_secs = v.parse().unwrap_or(config.token_ttl_secs);
        }
        if let Ok(v) = env::var("DEVCONNECT_GITHUB_API_BASE") {
            config.github.api_base = v;
        }
        config.github.client_id = env::var("DEVCONNECT_GITHUB_CLIENT_ID").ok();
        config.github.client_secret = env::var("DEVCONNECT_GITHUB_CLIENT_SECRET").ok();

        config
    }

    /// Override the signing secret (builder style, used by tests).
    #[must_use]
    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    /// Override the token lifetime (builder style, used by tests).
    #[must_use]
    pub const fn with_token_ttl(mut self, secs: i64) -> Self {
        self.token_ttl_secs = secs;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::development()
    }
}
