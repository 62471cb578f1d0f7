//! Mock providers for testing.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::error::GithubError;
use crate::models::GithubRepo;
use crate::providers::GithubClient;

/// Scriptable GitHub client.
///
/// Usernames registered with [`StubGithubClient::with_repos`] return their
/// listing; everything else behaves as an unknown GitHub profile.
#[derive(Debug, Clone, Default)]
pub struct StubGithubClient {
    listings: Arc<Mutex<HashMap<String, Vec<GithubRepo>>>>,
}

impl StubGithubClient {
    /// Create a stub with no known usernames.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listing for a username.
    #[must_use]
    pub fn with_repos(self, username: &str, repos: Vec<GithubRepo>) -> Self {
        if let Ok(mut guard) = self.listings.lock() {
            guard.insert(username.to_string(), repos);
        }
        self
    }
}

impl GithubClient for StubGithubClient {
    fn recent_repos(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Vec<GithubRepo>, GithubError>> + Send {
        let listings = Arc::clone(&self.listings);
        let username = username.to_string();

        async move {
            let guard = listings
                .lock()
                .map_err(|_| GithubError::Upstream("stub lock poisoned".to_string()))?;
            guard.get(&username).cloned().ok_or(GithubError::NotFound)
        }
    }
}
