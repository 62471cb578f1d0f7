//! User repository trait.

use std::future::Future;

use crate::error::RepoError;
use crate::models::{User, UserId};

/// User collection.
///
/// This trait abstracts over user document-store operations.
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// - `RepoError::Duplicate` when the email is already registered; the
    ///   store enforces uniqueness even if the handler's pre-check raced
    /// - `RepoError::Backend` on storage failure
    fn insert(&self, user: User) -> impl Future<Output = Result<User, RepoError>> + Send;

    /// Fetch a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn find_by_id(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<User>, RepoError>> + Send;

    /// Fetch a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, RepoError>> + Send;

    /// Delete a user record. Returns whether a record was removed.
    ///
    /// Part of the account-deletion cascade; posts and profile are removed
    /// by their own repositories first.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn remove(&self, user_id: UserId) -> impl Future<Output = Result<bool, RepoError>> + Send;
}
