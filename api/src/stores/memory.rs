//! In-memory document store.
//!
//! Each collection is an `Arc<Mutex<..>>` map. Methods clone the handle and
//! move it into the returned future, so the traits stay `Send` without
//! borrowing `self` across await points.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::error::RepoError;
use crate::models::{Post, PostId, Profile, SocialLinks, User, UserId};
use crate::providers::{PostRepository, ProfileRepository, ProfileUpdate, UserRepository};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepoError> {
    mutex
        .lock()
        .map_err(|_| RepoError::Backend("collection lock poisoned".to_string()))
}

// ═══════════════════════════════════════════════════════════════════════
// Users
// ═══════════════════════════════════════════════════════════════════════

/// In-memory user collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl MemoryUserRepository {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryUserRepository {
    fn insert(&self, user: User) -> impl Future<Output = Result<User, RepoError>> + Send {
        let users = Arc::clone(&self.users);

        async move {
            let mut guard = lock(&users)?;

            // Uniqueness is enforced here, not only in the handler's
            // pre-check, so a racing duplicate registration still fails
            if guard.values().any(|u| u.email == user.email) {
                return Err(RepoError::Duplicate(format!(
                    "email {} already registered",
                    user.email
                )));
            }

            guard.insert(user.id, user.clone());
            Ok(user)
        }
    }

    fn find_by_id(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<User>, RepoError>> + Send {
        let users = Arc::clone(&self.users);
        async move { Ok(lock(&users)?.get(&user_id).cloned()) }
    }

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, RepoError>> + Send {
        let users = Arc::clone(&self.users);
        let email = email.to_string();
        async move { Ok(lock(&users)?.values().find(|u| u.email == email).cloned()) }
    }

    fn remove(&self, user_id: UserId) -> impl Future<Output = Result<bool, RepoError>> + Send {
        let users = Arc::clone(&self.users);
        async move { Ok(lock(&users)?.remove(&user_id).is_some()) }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Profiles
// ═══════════════════════════════════════════════════════════════════════

/// In-memory profile collection, keyed by owner.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileRepository {
    profiles: Arc<Mutex<HashMap<UserId, Profile>>>,
}

impl MemoryProfileRepository {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_update(profile: &mut Profile, update: ProfileUpdate) {
    profile.status = update.status;
    profile.skills = update.skills;
    // Sparse update: present fields are set, absent fields keep their
    // stored value. The social block is replaced wholesale.
    if update.company.is_some() {
        profile.company = update.company;
    }
    if update.website.is_some() {
        profile.website = update.website;
    }
    if update.location.is_some() {
        profile.location = update.location;
    }
    if update.bio.is_some() {
        profile.bio = update.bio;
    }
    if update.github_username.is_some() {
        profile.github_username = update.github_username;
    }
    profile.social = update.social;
    profile.updated_at = Utc::now();
}

impl ProfileRepository for MemoryProfileRepository {
    fn find_by_owner(
        &self,
        owner: UserId,
    ) -> impl Future<Output = Result<Option<Profile>, RepoError>> + Send {
        let profiles = Arc::clone(&self.profiles);
        async move { Ok(lock(&profiles)?.get(&owner).cloned()) }
    }

    fn find_all(&self) -> impl Future<Output = Result<Vec<Profile>, RepoError>> + Send {
        let profiles = Arc::clone(&self.profiles);
        async move {
            let mut all: Vec<Profile> = lock(&profiles)?.values().cloned().collect();
            all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(all)
        }
    }

    fn upsert(
        &self,
        owner: UserId,
        update: ProfileUpdate,
    ) -> impl Future<Output = Result<Profile, RepoError>> + Send {
        let profiles = Arc::clone(&self.profiles);

        async move {
            let mut guard = lock(&profiles)?;
            let profile = guard.entry(owner).or_insert_with(|| Profile {
                user: owner,
                company: None,
                website: None,
                location: None,
                status: String::new(),
                bio: None,
                github_username: None,
                skills: Vec::new(),
                social: SocialLinks::default(),
                experience: Vec::new(),
                education: Vec::new(),
                updated_at: Utc::now(),
            });
            apply_update(profile, update);
            Ok(profile.clone())
        }
    }

    fn update<T, F>(
        &self,
        owner: UserId,
        f: F,
    ) -> impl Future<Output = Result<Option<T>, RepoError>> + Send
    where
        F: FnOnce(&mut Profile) -> T + Send,
        T: Send,
    {
        let profiles = Arc::clone(&self.profiles);

        async move {
            let mut guard = lock(&profiles)?;
            Ok(guard.get_mut(&owner).map(|profile| {
                let result = f(profile);
                profile.updated_at = Utc::now();
                result
            }))
        }
    }

    fn remove_by_owner(
        &self,
        owner: UserId,
    ) -> impl Future<Output = Result<bool, RepoError>> + Send {
        let profiles = Arc::clone(&self.profiles);
        async move { Ok(lock(&profiles)?.remove(&owner).is_some()) }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Posts
// ═══════════════════════════════════════════════════════════════════════

/// In-memory post collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryPostRepository {
    posts: Arc<Mutex<HashMap<PostId, Post>>>,
}

impl MemoryPostRepository {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PostRepository for MemoryPostRepository {
    fn insert(&self, post: Post) -> impl Future<Output = Result<Post, RepoError>> + Send {
        let posts = Arc::clone(&self.posts);
        async move {
            lock(&posts)?.insert(post.id, post.clone());
            Ok(post)
        }
    }

    fn find_all(&self) -> impl Future<Output = Result<Vec<Post>, RepoError>> + Send {
        let posts = Arc::clone(&self.posts);
        async move {
            let mut all: Vec<Post> = lock(&posts)?.values().cloned().collect();
            all.sort_by(|a, b| b.date.cmp(&a.date));
            Ok(all)
        }
    }

    fn find_by_id(
        &self,
        id: PostId,
    ) -> impl Future<Output = Result<Option<Post>, RepoError>> + Send {
        let posts = Arc::clone(&self.posts);
        async move { Ok(lock(&posts)?.get(&id).cloned()) }
    }

    fn update<T, F>(
        &self,
        id: PostId,
        f: F,
    ) -> impl Future<Output = Result<Option<T>, RepoError>> + Send
    where
        F: FnOnce(&mut Post) -> T + Send,
        T: Send,
    {
        let posts = Arc::clone(&self.posts);
        async move {
            let mut guard = lock(&posts)?;
            Ok(guard.get_mut(&id).map(f))
        }
    }

    fn remove(&self, id: PostId) -> impl Future<Output = Result<bool, RepoError>> + Send {
        let posts = Arc::clone(&self.posts);
        async move { Ok(lock(&posts)?.remove(&id).is_some()) }
    }

    fn remove_by_author(
        &self,
        author: UserId,
    ) -> impl Future<Output = Result<usize, RepoError>> + Send {
        let posts = Arc::clone(&self.posts);
        async move {
            let mut guard = lock(&posts)?;
            let before = guard.len();
            guard.retain(|_, post| post.user != author);
            Ok(before - guard.len())
        }
    }
}
