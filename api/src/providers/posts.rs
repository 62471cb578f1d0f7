//! Post repository trait.

use std::future::Future;

use crate::error::RepoError;
use crate::models::{Post, PostId, UserId};

/// Post collection.
pub trait PostRepository: Send + Sync {
    /// Insert a new post.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn insert(&self, post: Post) -> impl Future<Output = Result<Post, RepoError>> + Send;

    /// All posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Post>, RepoError>> + Send;

    /// Fetch a post by id.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn find_by_id(
        &self,
        id: PostId,
    ) -> impl Future<Output = Result<Option<Post>, RepoError>> + Send;

    /// Atomically mutate a post.
    ///
    /// The closure runs under the store's document lock; like/unlike and
    /// comment edits go through here so concurrent mutations of the same
    /// post cannot lose updates. Returns the closure's result, or `None`
    /// when the post does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn update<T, F>(
        &self,
        id: PostId,
        f: F,
    ) -> impl Future<Output = Result<Option<T>, RepoError>> + Send
    where
        F: FnOnce(&mut Post) -> T + Send,
        T: Send;

    /// Delete a post by id. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn remove(&self, id: PostId) -> impl Future<Output = Result<bool, RepoError>> + Send;

    /// Delete every post authored by a user, returning how many were
    /// removed. First step of the account-deletion cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Backend` on storage failure.
    fn remove_by_author(
        &self,
        author: UserId,
    ) -> impl Future<Output = Result<usize, RepoError>> + Send;
}
