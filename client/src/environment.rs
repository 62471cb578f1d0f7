//! Client environment.
//!
//! Injected dependencies for the client reducers: the API gateway and the
//! durable token cache.

use crate::gateway::ApiGateway;
use crate::token_cache::TokenCache;

/// Dependencies for the client reducers.
///
/// # Type Parameters
///
/// - `A`: API gateway
/// - `T`: token cache
#[derive(Clone)]
pub struct ClientEnvironment<A, T>
where
    A: ApiGateway + Clone,
    T: TokenCache + Clone,
{
    /// API gateway.
    pub api: A,
    /// Durable token storage.
    pub tokens: T,
}

impl<A, T> ClientEnvironment<A, T>
where
    A: ApiGateway + Clone,
    T: TokenCache + Clone,
{
    /// Create a new client environment.
    pub const fn new(api: A, tokens: T) -> Self {
        Self { api, tokens }
    }
}
