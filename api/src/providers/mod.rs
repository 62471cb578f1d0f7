//! Resource providers.
//!
//! This module defines traits for the external collaborators of the API:
//! the three document-store collections (users, profiles, posts) and the
//! GitHub listing client.
//!
//! Providers are **interfaces**, not implementations. Handlers depend on
//! these traits; the binary wires in concrete stores. This enables:
//!
//! - **Testing**: in-memory stores, deterministic
//! - **Production**: a durable document store behind the same seams
//! - **Development**: instrumented versions (logging, tracing)

pub mod github;
pub mod posts;
pub mod profiles;
pub mod users;

pub use github::GithubClient;
pub use posts::PostRepository;
pub use profiles::{ProfileRepository, ProfileUpdate};
pub use users::UserRepository;
