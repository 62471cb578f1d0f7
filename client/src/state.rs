//! Client application state.
//!
//! One explicit state struct with one slice per concern. Slices are owned
//! data; the Store serializes all mutation through the combined reducer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════
// Wire payloads
// ═══════════════════════════════════════════════════════════════════════

/// The authenticated identity returned by `GET /api/auth`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Avatar URL.
    pub avatar: String,
}

/// A like entry on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeData {
    /// Id of the user who liked.
    pub user: String,
}

/// A comment entry on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentData {
    /// Comment id.
    pub id: String,
    /// Comment author id.
    pub user: String,
    /// Comment body.
    pub text: String,
    /// Author name snapshot.
    pub name: String,
    /// Author avatar snapshot.
    pub avatar: String,
    /// Creation timestamp (RFC 3339).
    pub date: String,
}

/// A post as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostData {
    /// Post id.
    pub id: String,
    /// Author id.
    pub user: String,
    /// Post body.
    pub text: String,
    /// Author name snapshot.
    pub name: String,
    /// Author avatar snapshot.
    pub avatar: String,
    /// Likes, newest first.
    #[serde(default)]
    pub likes: Vec<LikeData>,
    /// Comments, newest first.
    #[serde(default)]
    pub comments: Vec<CommentData>,
    /// Creation timestamp (RFC 3339).
    pub date: String,
}

/// The owner field of a profile payload.
///
/// Read endpoints expand the owner to `{id, name, avatar}`; mutation
/// endpoints return the bare owner id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerRef {
    /// Expanded `{id, name, avatar}` summary.
    Summary {
        /// Owner id.
        id: String,
        /// Owner name.
        name: String,
        /// Owner avatar URL.
        avatar: String,
    },
    /// Bare owner id.
    Id(String),
}

/// A profile as served by the API.
///
/// Embedded entries and social links stay loosely typed: the client renders
/// them but never manipulates their structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    /// Profile owner.
    pub user: OwnerRef,
    /// Professional status.
    pub status: String,
    /// Ordered skill list.
    pub skills: Vec<String>,
    /// Current company.
    #[serde(default)]
    pub company: Option<String>,
    /// Personal website.
    #[serde(default)]
    pub website: Option<String>,
    /// Location.
    #[serde(default)]
    pub location: Option<String>,
    /// Short biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// GitHub username.
    #[serde(default)]
    pub github_username: Option<String>,
    /// Social links block.
    #[serde(default)]
    pub social: Value,
    /// Experience entries.
    #[serde(default)]
    pub experience: Vec<Value>,
    /// Education entries.
    #[serde(default)]
    pub education: Vec<Value>,
}

/// One repository from the GitHub listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoData {
    /// Repository name.
    pub name: String,
    /// Web URL.
    pub html_url: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Star count.
    #[serde(default)]
    pub stargazers_count: u64,
    /// Fork count.
    #[serde(default)]
    pub forks_count: u64,
    /// Primary language.
    #[serde(default)]
    pub language: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Slices
// ═══════════════════════════════════════════════════════════════════════

/// The `{message, status}` pair stored by a slice after a failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceError {
    /// Human-readable failure message.
    pub message: String,
    /// HTTP status of the failed request.
    pub status: u16,
}

/// Authentication slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSlice {
    /// Bearer token, mirrored to durable storage by effects.
    pub token: Option<String>,
    /// `None` until the first auth round trip settles.
    pub is_authenticated: Option<bool>,
    /// True while the initial identity load is outstanding.
    pub loading: bool,
    /// The loaded identity.
    pub user: Option<CurrentUser>,
}

impl Default for AuthSlice {
    fn default() -> Self {
        Self {
            token: None,
            is_authenticated: None,
            loading: true,
            user: None,
        }
    }
}

/// Profile slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSlice {
    /// The currently displayed profile.
    pub profile: Option<ProfileData>,
    /// The public profile listing.
    pub profiles: Vec<ProfileData>,
    /// GitHub repos for the displayed profile.
    pub repos: Vec<RepoData>,
    /// True while a fetch is outstanding.
    pub loading: bool,
    /// Last failure, if any.
    pub error: Option<SliceError>,
}

impl Default for ProfileSlice {
    fn default() -> Self {
        Self {
            profile: None,
            profiles: Vec::new(),
            repos: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

impl ProfileSlice {
    /// Reset to the empty/loading baseline, used before a fresh fetch so
    /// stale data never shows during navigation.
    pub fn clear(&mut self) {
        self.profile = None;
        self.repos.clear();
        self.loading = true;
        self.error = None;
    }
}

/// Posts slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsSlice {
    /// The feed, newest first.
    pub posts: Vec<PostData>,
    /// The single post currently open.
    pub post: Option<PostData>,
    /// True while a fetch is outstanding.
    pub loading: bool,
    /// Last failure, if any.
    pub error: Option<SliceError>,
}

impl Default for PostsSlice {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            post: None,
            loading: true,
            error: None,
        }
    }
}

/// Alert severity tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSeverity {
    /// Green banner.
    Success,
    /// Red banner.
    Danger,
    /// Neutral banner.
    Info,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert id; also keys the expiry timer for cancellation.
    pub id: Uuid,
    /// Message shown to the user.
    pub message: String,
    /// Severity tag.
    pub severity: AlertSeverity,
}

/// Alerts slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertsSlice {
    /// Active alerts in creation order.
    pub alerts: Vec<Alert>,
}

// ═══════════════════════════════════════════════════════════════════════
// Root state
// ═══════════════════════════════════════════════════════════════════════

/// Root client state: one slice per concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientState {
    /// Authentication slice.
    pub auth: AuthSlice,
    /// Profile slice.
    pub profile: ProfileSlice,
    /// Posts slice.
    pub posts: PostsSlice,
    /// Alerts slice.
    pub alerts: AlertsSlice,
}

impl ClientState {
    /// Fresh state with a token restored from durable storage (the
    /// equivalent of reading the saved token at app start).
    #[must_use]
    pub fn restored(token: Option<String>) -> Self {
        Self {
            auth: AuthSlice {
                token,
                ..AuthSlice::default()
            },
            ..Self::default()
        }
    }
}
