//! Client actions.
//!
//! All possible inputs to the client reducer, split the same way the
//! store architecture splits them:
//!
//! - **Commands**: user intent, one HTTP round trip each. The owning slice
//!   reducer turns a command into an `Effect::Future` that performs the
//!   call through the gateway and resolves to exactly one event.
//! - **Events**: typed results and errors fed back by effects.
//!
//! Actions are the only way to communicate with the client state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::{
    AlertSeverity, CommentData, CurrentUser, LikeData, PostData, ProfileData, RepoData,
};

/// Form fields for the create-or-update profile call.
///
/// Mirrors the profile form: everything optional except status and skills,
/// skills as the comma-separated string the form produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileForm {
    /// Professional status.
    pub status: String,
    /// Comma-separated skills.
    pub skills: String,
    /// Company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Biography.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// GitHub username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    /// YouTube URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    /// Twitter URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    /// Facebook URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    /// LinkedIn URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    /// Instagram URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// Form fields for adding an experience entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceForm {
    /// Job title.
    pub title: String,
    /// Company.
    pub company: String,
    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Start date.
    pub from: String,
    /// End date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Current position flag.
    pub current: bool,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Form fields for adding an education entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationForm {
    /// School.
    pub school: String,
    /// Degree.
    pub degree: String,
    /// Field of study.
    pub field_of_study: String,
    /// Start date.
    pub from: String,
    /// End date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Still enrolled flag.
    pub current: bool,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Client action: commands (user intent) and events (what happened).
#[derive(Debug, Clone, PartialEq)]
pub enum ClientAction {
    // ═══════════════════════════════════════════════════════════════════
    // Session commands
    // ═══════════════════════════════════════════════════════════════════
    /// Fetch the identity behind the stored token.
    LoadCurrentUser,
    /// Register a new account. Success chains `LoadCurrentUser`.
    Register {
        /// Display name.
        name: String,
        /// Email address.
        email: String,
        /// Password.
        password: String,
    },
    /// Log in. Success chains `LoadCurrentUser`.
    Login {
        /// Email address.
        email: String,
        /// Password.
        password: String,
    },
    /// Terminal logout: clears the slice and the persisted token.
    Logout,

    // ═══════════════════════════════════════════════════════════════════
    // Session events
    // ═══════════════════════════════════════════════════════════════════
    /// Identity load succeeded.
    UserLoaded {
        /// The authenticated identity.
        user: CurrentUser,
    },
    /// Identity load failed (missing/expired token).
    AuthFailed,
    /// Registration succeeded with a fresh token.
    RegisterSucceeded {
        /// Signed bearer token.
        token: String,
    },
    /// Registration failed.
    RegisterFailed {
        /// Validation messages, one alert each.
        errors: Vec<String>,
    },
    /// Login succeeded with a fresh token.
    LoginSucceeded {
        /// Signed bearer token.
        token: String,
    },
    /// Login failed.
    LoginFailed {
        /// Validation messages, one alert each.
        errors: Vec<String>,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Profile commands
    // ═══════════════════════════════════════════════════════════════════
    /// Fetch the authenticated user's profile.
    FetchCurrentProfile,
    /// Fetch all profiles. Clears the slice first (stale-data guard).
    FetchProfiles,
    /// Fetch one user's profile.
    FetchProfileByUser {
        /// Owner user id.
        user_id: String,
    },
    /// Fetch GitHub repos for a profile page.
    FetchGithubRepos {
        /// GitHub username.
        username: String,
    },
    /// Create or update the profile.
    SaveProfile {
        /// Form payload.
        form: ProfileForm,
        /// True when editing an existing profile (changes the alert text).
        editing: bool,
    },
    /// Add an experience entry.
    AddExperience {
        /// Form payload.
        form: ExperienceForm,
    },
    /// Add an education entry.
    AddEducation {
        /// Form payload.
        form: EducationForm,
    },
    /// Delete an experience entry by id.
    DeleteExperience {
        /// Entry id.
        id: String,
    },
    /// Delete an education entry by id.
    DeleteEducation {
        /// Entry id.
        id: String,
    },
    /// Delete the account (cascade server-side).
    DeleteAccount,

    // ═══════════════════════════════════════════════════════════════════
    // Profile events
    // ═══════════════════════════════════════════════════════════════════
    /// One profile loaded.
    ProfileLoaded {
        /// The profile payload.
        profile: ProfileData,
    },
    /// The public listing loaded.
    ProfilesLoaded {
        /// All profiles.
        profiles: Vec<ProfileData>,
    },
    /// Create-or-update succeeded.
    ProfileSaved {
        /// The stored profile.
        profile: ProfileData,
        /// Whether this was an edit.
        editing: bool,
    },
    /// A sub-entity mutation succeeded.
    ProfileUpdated {
        /// The updated profile.
        profile: ProfileData,
        /// Success alert text for this operation.
        notice: String,
    },
    /// GitHub listing loaded.
    ReposLoaded {
        /// The repositories.
        repos: Vec<RepoData>,
    },
    /// Reset the profile slice to its loading baseline.
    ProfileCleared,
    /// Account deletion confirmed by the server.
    AccountDeleted,
    /// A profile request failed.
    ProfileFailed {
        /// Failure message (status text).
        message: String,
        /// HTTP status.
        status: u16,
        /// Validation messages, one alert each.
        errors: Vec<String>,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Posts commands
    // ═══════════════════════════════════════════════════════════════════
    /// Fetch the feed.
    FetchPosts,
    /// Fetch one post.
    FetchPost {
        /// Post id.
        id: String,
    },
    /// Create a post.
    CreatePost {
        /// Post text.
        text: String,
    },
    /// Delete a post (owner only, enforced server-side).
    DeletePost {
        /// Post id.
        id: String,
    },
    /// Like a post.
    LikePost {
        /// Post id.
        id: String,
    },
    /// Remove a like.
    UnlikePost {
        /// Post id.
        id: String,
    },
    /// Add a comment.
    AddComment {
        /// Post id.
        post_id: String,
        /// Comment text.
        text: String,
    },
    /// Delete a comment (owner only, enforced server-side).
    DeleteComment {
        /// Post id.
        post_id: String,
        /// Comment id.
        comment_id: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Posts events
    // ═══════════════════════════════════════════════════════════════════
    /// Feed loaded.
    PostsLoaded {
        /// The posts, newest first.
        posts: Vec<PostData>,
    },
    /// Single post loaded.
    PostLoaded {
        /// The post.
        post: PostData,
    },
    /// Post created.
    PostCreated {
        /// The new post.
        post: PostData,
    },
    /// Post deleted.
    PostDeleted {
        /// Deleted post id.
        id: String,
    },
    /// Like list changed for a post.
    LikesUpdated {
        /// The post whose likes changed.
        post_id: String,
        /// The authoritative like list.
        likes: Vec<LikeData>,
    },
    /// Comment list changed for a post.
    CommentsUpdated {
        /// The post whose comments changed.
        post_id: String,
        /// The authoritative comment list.
        comments: Vec<CommentData>,
        /// Success alert text for this operation.
        notice: String,
    },
    /// A post request failed.
    PostFailed {
        /// Failure message (status text).
        message: String,
        /// HTTP status.
        status: u16,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Alerts
    // ═══════════════════════════════════════════════════════════════════
    /// Raise a transient alert; schedules its own expiry.
    ShowAlert {
        /// Message shown to the user.
        message: String,
        /// Severity tag.
        severity: AlertSeverity,
    },
    /// Dismiss an alert early, cancelling its expiry timer.
    DismissAlert {
        /// Alert id.
        id: Uuid,
    },
    /// An alert's expiry timer fired.
    AlertExpired {
        /// Alert id.
        id: Uuid,
    },
}
