//! Mock gateway for testing.
//!
//! Scripted per result type rather than per endpoint: every
//! profile-returning call shares one scripted slot, and the recorded call
//! log tells tests which endpoint was actually hit. Unscripted calls fail
//! loudly with status 599.

use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::actions::{EducationForm, ExperienceForm, ProfileForm};
use crate::gateway::{ApiFailure, ApiGateway, GatewayResult};
use crate::state::{CommentData, CurrentUser, LikeData, PostData, ProfileData, RepoData};

type Slot<T> = Arc<Mutex<Option<GatewayResult<T>>>>;

fn take_or_unscripted<T: Clone>(slot: &Slot<T>, call: &str) -> GatewayResult<T> {
    slot.lock()
        .ok()
        .and_then(|guard| guard.clone())
        .unwrap_or_else(|| {
            Err(ApiFailure {
                status: 599,
                message: format!("unscripted mock call: {call}"),
                errors: Vec::new(),
            })
        })
}

/// Scriptable in-memory gateway.
#[derive(Clone, Default)]
pub struct MockGateway {
    token: Slot<String>,
    user: Slot<CurrentUser>,
    profile: Slot<ProfileData>,
    profiles: Slot<Vec<ProfileData>>,
    repos: Slot<Vec<RepoData>>,
    unit: Slot<()>,
    post: Slot<PostData>,
    posts: Slot<Vec<PostData>>,
    likes: Slot<Vec<LikeData>>,
    comments: Slot<Vec<CommentData>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockGateway {
    /// Create a gateway with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: &str) {
        if let Ok(mut guard) = self.calls.lock() {
            guard.push(call.to_string());
        }
    }

    /// Endpoints hit so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|guard| guard.clone()).unwrap_or_default()
    }

    fn script<T>(slot: &Slot<T>, result: GatewayResult<T>) {
        if let Ok(mut guard) = slot.lock() {
            *guard = Some(result);
        }
    }

    /// Script the result of `register`/`login`.
    #[must_use]
    pub fn with_token(self, result: GatewayResult<String>) -> Self {
        Self::script(&self.token, result);
        self
    }

    /// Script the result of `current_user`.
    #[must_use]
    pub fn with_current_user(self, result: GatewayResult<CurrentUser>) -> Self {
        Self::script(&self.user, result);
        self
    }

    /// Script the result of every profile-returning call.
    #[must_use]
    pub fn with_profile(self, result: GatewayResult<ProfileData>) -> Self {
        Self::script(&self.profile, result);
        self
    }

    /// Script the result of `profiles`.
    #[must_use]
    pub fn with_profiles(self, result: GatewayResult<Vec<ProfileData>>) -> Self {
        Self::script(&self.profiles, result);
        self
    }

    /// Script the result of `github_repos`.
    #[must_use]
    pub fn with_repos(self, result: GatewayResult<Vec<RepoData>>) -> Self {
        Self::script(&self.repos, result);
        self
    }

    /// Script the result of unit-returning calls (`delete_account`,
    /// `delete_post`).
    #[must_use]
    pub fn with_unit(self, result: GatewayResult<()>) -> Self {
        Self::script(&self.unit, result);
        self
    }

    /// Script the result of single-post calls (`post`, `create_post`).
    #[must_use]
    pub fn with_post(self, result: GatewayResult<PostData>) -> Self {
        Self::script(&self.post, result);
        self
    }

    /// Script the result of `posts`.
    #[must_use]
    pub fn with_posts(self, result: GatewayResult<Vec<PostData>>) -> Self {
        Self::script(&self.posts, result);
        self
    }

    /// Script the result of `like_post`/`unlike_post`.
    #[must_use]
    pub fn with_likes(self, result: GatewayResult<Vec<LikeData>>) -> Self {
        Self::script(&self.likes, result);
        self
    }

    /// Script the result of `add_comment`/`delete_comment`.
    #[must_use]
    pub fn with_comments(self, result: GatewayResult<Vec<CommentData>>) -> Self {
        Self::script(&self.comments, result);
        self
    }
}

impl ApiGateway for MockGateway {
    fn register(
        &self,
        _name: String,
        _email: String,
        _password: String,
    ) -> impl Future<Output = GatewayResult<String>> + Send {
        self.record("register");
        let slot = Arc::clone(&self.token);
        async move { take_or_unscripted(&slot, "register") }
    }

    fn login(
        &self,
        _email: String,
        _password: String,
    ) -> impl Future<Output = GatewayResult<String>> + Send {
        self.record("login");
        let slot = Arc::clone(&self.token);
        async move { take_or_unscripted(&slot, "login") }
    }

    fn current_user(&self) -> impl Future<Output = GatewayResult<CurrentUser>> + Send {
        self.record("current_user");
        let slot = Arc::clone(&self.user);
        async move { take_or_unscripted(&slot, "current_user") }
    }

    fn my_profile(&self) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        self.record("my_profile");
        let slot = Arc::clone(&self.profile);
        async move { take_or_unscripted(&slot, "my_profile") }
    }

    fn profiles(&self) -> impl Future<Output = GatewayResult<Vec<ProfileData>>> + Send {
        self.record("profiles");
        let slot = Arc::clone(&self.profiles);
        async move { take_or_unscripted(&slot, "profiles") }
    }

    fn profile_by_user(
        &self,
        _user_id: String,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        self.record("profile_by_user");
        let slot = Arc::clone(&self.profile);
        async move { take_or_unscripted(&slot, "profile_by_user") }
    }

    fn github_repos(
        &self,
        _username: String,
    ) -> impl Future<Output = GatewayResult<Vec<RepoData>>> + Send {
        self.record("github_repos");
        let slot = Arc::clone(&self.repos);
        async move { take_or_unscripted(&slot, "github_repos") }
    }

    fn save_profile(
        &self,
        _form: ProfileForm,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        self.record("save_profile");
        let slot = Arc::clone(&self.profile);
        async move { take_or_unscripted(&slot, "save_profile") }
    }

    fn add_experience(
        &self,
        _form: ExperienceForm,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        self.record("add_experience");
        let slot = Arc::clone(&self.profile);
        async move { take_or_unscripted(&slot, "add_experience") }
    }

    fn add_education(
        &self,
        _form: EducationForm,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        self.record("add_education");
        let slot = Arc::clone(&self.profile);
        async move { take_or_unscripted(&slot, "add_education") }
    }

    fn delete_experience(
        &self,
        _id: String,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        self.record("delete_experience");
        let slot = Arc::clone(&self.profile);
        async move { take_or_unscripted(&slot, "delete_experience") }
    }

    fn delete_education(
        &self,
        _id: String,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        self.record("delete_education");
        let slot = Arc::clone(&self.profile);
        async move { take_or_unscripted(&slot, "delete_education") }
    }

    fn delete_account(&self) -> impl Future<Output = GatewayResult<()>> + Send {
        self.record("delete_account");
        let slot = Arc::clone(&self.unit);
        async move { take_or_unscripted(&slot, "delete_account") }
    }

    fn posts(&self) -> impl Future<Output = GatewayResult<Vec<PostData>>> + Send {
        self.record("posts");
        let slot = Arc::clone(&self.posts);
        async move { take_or_unscripted(&slot, "posts") }
    }

    fn post(&self, _id: String) -> impl Future<Output = GatewayResult<PostData>> + Send {
        self.record("post");
        let slot = Arc::clone(&self.post);
        async move { take_or_unscripted(&slot, "post") }
    }

    fn create_post(&self, _text: String) -> impl Future<Output = GatewayResult<PostData>> + Send {
        self.record("create_post");
        let slot = Arc::clone(&self.post);
        async move { take_or_unscripted(&slot, "create_post") }
    }

    fn delete_post(&self, _id: String) -> impl Future<Output = GatewayResult<()>> + Send {
        self.record("delete_post");
        let slot = Arc::clone(&self.unit);
        async move { take_or_unscripted(&slot, "delete_post") }
    }

    fn like_post(&self, _id: String) -> impl Future<Output = GatewayResult<Vec<LikeData>>> + Send {
        self.record("like_post");
        let slot = Arc::clone(&self.likes);
        async move { take_or_unscripted(&slot, "like_post") }
    }

    fn unlike_post(
        &self,
        _id: String,
    ) -> impl Future<Output = GatewayResult<Vec<LikeData>>> + Send {
        self.record("unlike_post");
        let slot = Arc::clone(&self.likes);
        async move { take_or_unscripted(&slot, "unlike_post") }
    }

    fn add_comment(
        &self,
        _post_id: String,
        _text: String,
    ) -> impl Future<Output = GatewayResult<Vec<CommentData>>> + Send {
        self.record("add_comment");
        let slot = Arc::clone(&self.comments);
        async move { take_or_unscripted(&slot, "add_comment") }
    }

    fn delete_comment(
        &self,
        _post_id: String,
        _comment_id: String,
    ) -> impl Future<Output = GatewayResult<Vec<CommentData>>> + Send {
        self.record("delete_comment");
        let slot = Arc::clone(&self.comments);
        async move { take_or_unscripted(&slot, "delete_comment") }
    }
}
