//! API gateway trait.
//!
//! One method per endpoint the client talks to. Implementations perform a
//! single HTTP round trip and translate failures into [`ApiFailure`]; the
//! reducers never see transport types.

use std::future::Future;

use thiserror::Error;

use crate::actions::{EducationForm, ExperienceForm, ProfileForm};
use crate::state::{CommentData, CurrentUser, LikeData, PostData, ProfileData, RepoData};

/// A failed API round trip.
///
/// `message`/`status` feed the slice error events; `errors` carries the
/// server's validation list for per-message alert fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("api failure ({status}): {message}")]
pub struct ApiFailure {
    /// HTTP status code (0 when the request never reached the server).
    pub status: u16,
    /// Status text or transport error message.
    pub message: String,
    /// Validation messages from an `{"errors": [...]}` body.
    pub errors: Vec<String>,
}

impl ApiFailure {
    /// A transport-level failure that produced no HTTP response.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            message: message.into(),
            errors: Vec::new(),
        }
    }
}

/// Result alias for gateway calls.
pub type GatewayResult<T> = Result<T, ApiFailure>;

/// The REST surface as seen from the client.
///
/// Methods take owned values so implementations can move them into their
/// request futures. Authenticated calls read the persisted token
/// themselves - mirroring the original client, where the stored token is
/// attached globally rather than threaded through each call site.
pub trait ApiGateway: Send + Sync {
    /// `POST /api/users` - returns a signed token.
    fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> impl Future<Output = GatewayResult<String>> + Send;

    /// `POST /api/auth` - returns a signed token.
    fn login(
        &self,
        email: String,
        password: String,
    ) -> impl Future<Output = GatewayResult<String>> + Send;

    /// `GET /api/auth` - the identity behind the stored token.
    fn current_user(&self) -> impl Future<Output = GatewayResult<CurrentUser>> + Send;

    /// `GET /api/profile/me`.
    fn my_profile(&self) -> impl Future<Output = GatewayResult<ProfileData>> + Send;

    /// `GET /api/profile`.
    fn profiles(&self) -> impl Future<Output = GatewayResult<Vec<ProfileData>>> + Send;

    /// `GET /api/profile/user/:user_id`.
    fn profile_by_user(
        &self,
        user_id: String,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send;

    /// `GET /api/profile/github/:username`.
    fn github_repos(
        &self,
        username: String,
    ) -> impl Future<Output = GatewayResult<Vec<RepoData>>> + Send;

    /// `POST /api/profile` - create-or-update.
    fn save_profile(
        &self,
        form: ProfileForm,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send;

    /// `PUT /api/profile/experience`.
    fn add_experience(
        &self,
        form: ExperienceForm,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send;

    /// `PUT /api/profile/education`.
    fn add_education(
        &self,
        form: EducationForm,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send;

    /// `DELETE /api/profile/experience/:id`.
    fn delete_experience(
        &self,
        id: String,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send;

    /// `DELETE /api/profile/education/:id`.
    fn delete_education(
        &self,
        id: String,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send;

    /// `DELETE /api/profile` - account cascade deletion.
    fn delete_account(&self) -> impl Future<Output = GatewayResult<()>> + Send;

    /// `GET /api/posts`.
    fn posts(&self) -> impl Future<Output = GatewayResult<Vec<PostData>>> + Send;

    /// `GET /api/posts/:id`.
    fn post(&self, id: String) -> impl Future<Output = GatewayResult<PostData>> + Send;

    /// `POST /api/posts`.
    fn create_post(&self, text: String) -> impl Future<Output = GatewayResult<PostData>> + Send;

    /// `DELETE /api/posts/:id`.
    fn delete_post(&self, id: String) -> impl Future<Output = GatewayResult<()>> + Send;

    /// `PUT /api/posts/like/:id` - returns the authoritative like list.
    fn like_post(
        &self,
        id: String,
    ) -> impl Future<Output = GatewayResult<Vec<LikeData>>> + Send;

    /// `PUT /api/posts/unlike/:id` - returns the authoritative like list.
    fn unlike_post(
        &self,
        id: String,
    ) -> impl Future<Output = GatewayResult<Vec<LikeData>>> + Send;

    /// `POST /api/posts/comment/:id` - returns the comment list.
    fn add_comment(
        &self,
        post_id: String,
        text: String,
    ) -> impl Future<Output = GatewayResult<Vec<CommentData>>> + Send;

    /// `DELETE /api/posts/comment/:post_id/:comment_id` - returns the
    /// comment list.
    fn delete_comment(
        &self,
        post_id: String,
        comment_id: String,
    ) -> impl Future<Output = GatewayResult<Vec<CommentData>>> + Send;
}
