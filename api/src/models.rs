//! Domain models.
//!
//! All types are `Clone` and serializable. Password hashes are never
//! serialized; API-facing views are separate types where the stored shape
//! and the wire shape differ.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub uuid::Uuid);

impl UserId {
    /// Generate a new random `UserId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error when the input is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub uuid::Uuid);

impl PostId {
    /// Generate a new random `PostId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error when the input is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an embedded sub-entity (experience, education,
/// comment). Sub-entities carry their own id so they can be targeted for
/// removal regardless of position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub uuid::Uuid);

impl EntryId {
    /// Generate a new random `EntryId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error when the input is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// User
// ═══════════════════════════════════════════════════════════════════════

/// User account as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Email address (unique across users).
    pub email: String,

    /// Argon2 PHC-format password hash. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Avatar URL derived from the email.
    pub avatar: String,

    /// Account created timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The API-facing view of this user (no credentials).
    #[must_use]
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
            created_at: self.created_at,
        }
    }

    /// The compact owner summary embedded in profile views.
    #[must_use]
    pub fn summary(&self) -> OwnerSummary {
        OwnerSummary {
            id: self.id,
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// User as returned by the API - everything except credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Avatar URL.
    pub avatar: String,
    /// Account created timestamp.
    pub created_at: DateTime<Utc>,
}

/// Compact `{id, name, avatar}` owner reference joined into profile views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSummary {
    /// Owner's user ID.
    pub id: UserId,
    /// Owner's display name.
    pub name: String,
    /// Owner's avatar URL.
    pub avatar: String,
}

// ═══════════════════════════════════════════════════════════════════════
// Profile
// ═══════════════════════════════════════════════════════════════════════

/// Social links attached to a profile.
///
/// The whole block is replaced on each profile upsert: keys present in the
/// request are set, the rest are cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    /// YouTube channel URL.
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

/// Work experience entry embedded in a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    /// Entry ID, used for targeted deletion.
    pub id: EntryId,
    /// Job title.
    pub title: String,
    /// Company name.
    pub company: String,
    /// Location, free-form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Start date, free-form (matches the form input).
    pub from: String,
    /// End date; absent while `current`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Whether this is the current position.
    #[serde(default)]
    pub current: bool,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Education entry embedded in a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    /// Entry ID, used for targeted deletion.
    pub id: EntryId,
    /// School name.
    pub school: String,
    /// Degree obtained.
    pub degree: String,
    /// Field of study.
    pub field_of_study: String,
    /// Start date, free-form.
    pub from: String,
    /// End date; absent while `current`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Whether still enrolled.
    #[serde(default)]
    pub current: bool,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Developer profile as stored. Exactly one per owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Owner reference - the user allowed to mutate this profile.
    pub user: UserId,
    /// Current company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Personal website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Location, free-form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Professional status (e.g. "Developer"). Required.
    pub status: String,
    /// Short biography.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// GitHub username for the repo listing on the profile page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    /// Ordered skill list.
    pub skills: Vec<String>,
    /// Social links.
    #[serde(default)]
    pub social: SocialLinks,
    /// Work experience entries, newest first.
    #[serde(default)]
    pub experience: Vec<Experience>,
    /// Education entries, newest first.
    #[serde(default)]
    pub education: Vec<Education>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Join the owner summary onto this profile for read endpoints.
    #[must_use]
    pub fn with_owner(self, owner: OwnerSummary) -> ProfileView {
        ProfileView {
            user: owner,
            company: self.company,
            website: self.website,
            location: self.location,
            status: self.status,
            bio: self.bio,
            github_username: self.github_username,
            skills: self.skills,
            social: self.social,
            experience: self.experience,
            education: self.education,
            updated_at: self.updated_at,
        }
    }
}

/// Profile as returned by read endpoints: owner reference expanded to
/// `{id, name, avatar}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    /// Owner summary.
    pub user: OwnerSummary,
    /// Current company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Personal website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Location, free-form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Professional status.
    pub status: String,
    /// Short biography.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// GitHub username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    /// Ordered skill list.
    pub skills: Vec<String>,
    /// Social links.
    pub social: SocialLinks,
    /// Work experience entries.
    pub experience: Vec<Experience>,
    /// Education entries.
    pub education: Vec<Education>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

// ═══════════════════════════════════════════════════════════════════════
// Post
// ═══════════════════════════════════════════════════════════════════════

/// A like on a post. One per user per post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    /// The user who liked the post.
    pub user: UserId,
}

/// A comment embedded in a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID, used for targeted deletion and ownership checks.
    pub id: EntryId,
    /// Comment author.
    pub user: UserId,
    /// Comment body.
    pub text: String,
    /// Author name snapshot at comment time.
    pub name: String,
    /// Author avatar snapshot at comment time.
    pub avatar: String,
    /// Creation timestamp.
    pub date: DateTime<Utc>,
}

/// A post with its embedded likes and comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post ID.
    pub id: PostId,
    /// Author reference - the user allowed to delete this post.
    pub user: UserId,
    /// Post body.
    pub text: String,
    /// Author name snapshot at creation time.
    pub name: String,
    /// Author avatar snapshot at creation time.
    pub avatar: String,
    /// Likes, newest first.
    #[serde(default)]
    pub likes: Vec<Like>,
    /// Comments, newest first.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Creation timestamp.
    pub date: DateTime<Utc>,
}

// ═══════════════════════════════════════════════════════════════════════
// GitHub
// ═══════════════════════════════════════════════════════════════════════

/// One repository from the GitHub listing proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubRepo {
    /// Repository name.
    pub name: String,
    /// Web URL.
    pub html_url: String,
    /// Repository description.
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
