//! Handler environment.
//!
//! All external dependencies of the handlers, injected as trait
//! implementations. The axum router holds this behind an `Arc` as shared
//! state.

use crate::config::ApiConfig;
use crate::providers::{GithubClient, PostRepository, ProfileRepository, UserRepository};

/// Dependencies for the REST handlers.
///
/// # Type Parameters
///
/// - `U`: user repository
/// - `P`: profile repository
/// - `B`: post repository
/// - `G`: GitHub client
pub struct ApiEnvironment<U, P, B, G>
where
    U: UserRepository,
    P: ProfileRepository,
    B: PostRepository,
    G: GithubClient,
{
    /// Service configuration.
    pub config: ApiConfig,
    /// User collection.
    pub users: U,
    /// Profile collection.
    pub profiles: P,
    /// Post collection.
    pub posts: B,
    /// GitHub listing client.
    pub github: G,
}

impl<U, P, B, G> ApiEnvironment<U, P, B, G>
where
    U: UserRepository,
    P: ProfileRepository,
    B: PostRepository,
    G: GithubClient,
{
    /// Create a new environment.
    pub const fn new(config: ApiConfig, users: U, profiles: P, posts: B, github: G) -> Self {
        Self {
            config,
            users,
            profiles,
            posts,
            github,
        }
    }
}
