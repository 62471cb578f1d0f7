//! # Devconnect API
//!
//! REST backend for the devconnect developer network: users, profiles,
//! posts (with likes and comments), and a GitHub repo-listing proxy.
//!
//! ## Architecture
//!
//! ```text
//! Request → Auth guard (bearer extractor) → Handler
//!              validate fields → authorize owner → mutate via repository
//!                                                     ↓
//!                                       document store (trait seam)
//! ```
//!
//! Handlers depend on the provider traits in [`providers`]; concrete
//! collections live in [`stores`]. The environment is injected through
//! Axum state, never a global.

pub mod auth;
pub mod config;
pub mod environment;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mocks;
pub mod models;
pub mod providers;
pub mod router;
pub mod stores;

// Re-export main types for convenience
pub use config::ApiConfig;
pub use environment::ApiEnvironment;
pub use error::{ApiError, GithubError, RepoError};
pub use extract::AuthUser;
pub use router::api_router;
