//! GitHub listing client.
//!
//! A direct passthrough to the GitHub repo-listing endpoint: five most
//! recently created repositories for a username.

use std::future::Future;

use crate::config::GithubConfig;
use crate::error::GithubError;
use crate::models::GithubRepo;

/// Client for the public repo listing on profile pages.
pub trait GithubClient: Send + Sync {
    /// The user's five most recently created public repositories.
    ///
    /// # Errors
    ///
    /// - `GithubError::NotFound` when the username has no GitHub profile
    /// - `GithubError::Upstream` for any other upstream failure
    fn recent_repos(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Vec<GithubRepo>, GithubError>> + Send;
}

/// Production client backed by `reqwest`.
#[derive(Clone)]
pub struct HttpGithubClient {
    client: reqwest::Client,
    config: GithubConfig,
}

impl HttpGithubClient {
    /// Create a client with the given proxy configuration.
    #[must_use]
    pub fn new(config: GithubConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

impl GithubClient for HttpGithubClient {
    fn recent_repos(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Vec<GithubRepo>, GithubError>> + Send {
        let client = self.client.clone();
        let config = self.config.clone();
        let username = username.to_string();

        async move {
            let url = format!(
                "{}/users/{}/repos",
                config.api_base.trim_end_matches('/'),
                username
            );

            let mut request = client
                .get(&url)
                .query(&[("per_page", "5"), ("sort", "created:asc")])
                // GitHub rejects requests without a user agent
                .header(reqwest::header::USER_AGENT, "devconnect");

            if let (Some(id), Some(secret)) = (&config.client_id, &config.client_secret) {
                request = request.query(&[("client_id", id), ("client_secret", secret)]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| GithubError::Upstream(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                response
                    .json::<Vec<GithubRepo>>()
                    .await
                    .map_err(|e| GithubError::Upstream(format!("invalid repo listing: {e}")))
            } else if status == reqwest::StatusCode::NOT_FOUND {
                Err(GithubError::NotFound)
            } else {
                Err(GithubError::Upstream(format!(
                    "unexpected status {status} from GitHub"
                )))
            }
        }
    }
}
