//! Profile repository trait.

use std::future::Future;

use crate::error::RepoError;
use crate::models::{Profile, SocialLinks, UserId};

/// Sparse update document for the create-or-update operation.
///
/// Required fields (`status`, `skills`) are always present - validation
/// rejects the request before this type is built otherwise. Optional fields
/// follow the upsert contract: `Some` sets the field, `None` leaves it
/// untouched on update (and omits it on create). The social block is
/// replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    /// Professional status. Required.
    pub status: String,
    /// Ordered skill list. Required.
    pub skills: Vec<String>,
    /// Current company.
    pub company: Option<String>,
    /// Personal website.
    pub website: Option<String>,
    /// Location.
    pub location: Option<String>,
    /// Short biography.
    pub bio: Option<String>,
    /// GitHub username.
    pub github_username: Option<String>,
    /// Social links, replacing the stored block.
    pub social: SocialLinks,
}

/// Profile collection, keyed by owner reference.
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile owned by a user.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn find_by_owner(
        &self,
        owner: UserId,
    ) -> impl Future<Output = Result<Option<Profile>, RepoError>> + Send;

    /// List all profiles.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Profile>, RepoError>> + Send;

    /// Create-if-absent-else-update, keyed by owner reference.
    ///
    /// Idempotent: applying the same update twice yields the same stored
    /// document (up to `updated_at`).
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn upsert(
        &self,
        owner: UserId,
        update: ProfileUpdate,
    ) -> impl Future<Output = Result<Profile, RepoError>> + Send;

    /// Atomically mutate the profile owned by a user.
    ///
    /// The closure runs under the store's document lock, so concurrent
    /// sub-entity edits cannot lose each other's writes. Returns the
    /// closure's result, or `None` when the owner has no profile.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn update<T, F>(
        &self,
        owner: UserId,
        f: F,
    ) -> impl Future<Output = Result<Option<T>, RepoError>> + Send
    where
        F: FnOnce(&mut Profile) -> T + Send,
        T: Send;

    /// Delete the profile owned by a user. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn remove_by_owner(
        &self,
        owner: UserId,
    ) -> impl Future<Output = Result<bool, RepoError>> + Send;
}
