//! Profile handlers: current profile, create-or-update, public listings,
//! sub-entity management, account deletion, and the GitHub repo proxy.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use devconnect_web::FieldError;
use serde::Deserialize;

use crate::environment::ApiEnvironment;
use crate::error::{ApiError, GithubError};
use crate::extract::AuthUser;
use crate::handlers::posts::MessageResponse;
use crate::handlers::present;
use crate::models::{
    Education, EntryId, Experience, GithubRepo, Profile, ProfileView, SocialLinks, UserId,
};
use crate::providers::{
    GithubClient, PostRepository, ProfileRepository, ProfileUpdate, UserRepository,
};

// ═══════════════════════════════════════════════════════════════════════
// Request bodies
// ═══════════════════════════════════════════════════════════════════════

/// Skills as submitted: either a comma-separated string (the profile form)
/// or an explicit list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillsField {
    /// `"js, go"`
    Csv(String),
    /// `["js", "go"]`
    List(Vec<String>),
}

impl SkillsField {
    fn into_list(self) -> Vec<String> {
        let items = match self {
            Self::Csv(csv) => csv.split(',').map(str::to_string).collect(),
            Self::List(list) => list,
        };
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Create-or-update profile request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileBody {
    /// Professional status. Required.
    #[serde(default)]
    pub status: Option<String>,
    /// Skill list. Required.
    #[serde(default)]
    pub skills: Option<SkillsField>,
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
    #[serde(default, alias = "githubusername")]
    pub github_username: Option<String>,
    /// YouTube URL.
    #[serde(default)]
    pub youtube: Option<String>,
    /// Twitter URL.
    #[serde(default)]
    pub twitter: Option<String>,
    /// Facebook URL.
    #[serde(default)]
    pub facebook: Option<String>,
    /// LinkedIn URL.
    #[serde(default)]
    pub linkedin: Option<String>,
    /// Instagram URL.
    #[serde(default)]
    pub instagram: Option<String>,
}

fn non_blank(field: Option<String>) -> Option<String> {
    field.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn validate_profile(body: ProfileBody) -> Result<ProfileUpdate, ApiError> {
    let mut errors = Vec::new();

    if !present(body.status.as_ref()) {
        errors.push(FieldError::new("status", "Status is required"));
    }

    let skills = body.skills.map(SkillsField::into_list).unwrap_or_default();
    if skills.is_empty() {
        errors.push(FieldError::new("skills", "Skills is required"));
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    Ok(ProfileUpdate {
        status: body.status.unwrap_or_default().trim().to_string(),
        skills,
        company: non_blank(body.company),
        website: non_blank(body.website),
        location: non_blank(body.location),
        bio: non_blank(body.bio),
        github_username: non_blank(body.github_username),
        social: SocialLinks {
            youtube: non_blank(body.youtube),
            twitter: non_blank(body.twitter),
            facebook: non_blank(body.facebook),
            linkedin: non_blank(body.linkedin),
            instagram: non_blank(body.instagram),
        },
    })
}

/// Experience entry request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperienceBody {
    /// Job title. Required.
    #[serde(default)]
    pub title: Option<String>,
    /// Company. Required.
    #[serde(default)]
    pub company: Option<String>,
    /// Location.
    #[serde(default)]
    pub location: Option<String>,
    /// Start date. Required.
    #[serde(default)]
    pub from: Option<String>,
    /// End date.
    #[serde(default)]
    pub to: Option<String>,
    /// Current position flag.
    #[serde(default)]
    pub current: bool,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

fn validate_experience(body: ExperienceBody) -> Result<Experience, ApiError> {
    let mut errors = Vec::new();
    if !present(body.title.as_ref()) {
        errors.push(FieldError::new("title", "Title is required"));
    }
    if !present(body.company.as_ref()) {
        errors.push(FieldError::new("company", "Company is required"));
    }
    if !present(body.from.as_ref()) {
        errors.push(FieldError::new("from", "From date is required"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    Ok(Experience {
        id: EntryId::new(),
        title: body.title.unwrap_or_default().trim().to_string(),
        company: body.company.unwrap_or_default().trim().to_string(),
        location: non_blank(body.location),
        from: body.from.unwrap_or_default().trim().to_string(),
        to: non_blank(body.to),
        current: body.current,
        description: non_blank(body.description),
    })
}

/// Education entry request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EducationBody {
    /// School. Required.
    #[serde(default)]
    pub school: Option<String>,
    /// Degree. Required.
    #[serde(default)]
    pub degree: Option<String>,
    /// Field of study. Required.
    #[serde(default, alias = "fieldofstudy")]
    pub field_of_study: Option<String>,
    /// Start date. Required.
    #[serde(default)]
    pub from: Option<String>,
    /// End date.
    #[serde(default)]
    pub to: Option<String>,
    /// Still enrolled flag.
    #[serde(default)]
    pub current: bool,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

fn validate_education(body: EducationBody) -> Result<Education, ApiError> {
    let mut errors = Vec::new();
    if !present(body.school.as_ref()) {
        errors.push(FieldError::new("school", "School is required"));
    }
    if !present(body.degree.as_ref()) {
        errors.push(FieldError::new("degree", "Degree is required"));
    }
    if !present(body.field_of_study.as_ref()) {
        errors.push(FieldError::new("fieldofstudy", "Field of study is required"));
    }
    if !present(body.from.as_ref()) {
        errors.push(FieldError::new("from", "From date is required"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    Ok(Education {
        id: EntryId::new(),
        school: body.school.unwrap_or_default().trim().to_string(),
        degree: body.degree.unwrap_or_default().trim().to_string(),
        field_of_study: body.field_of_study.unwrap_or_default().trim().to_string(),
        from: body.from.unwrap_or_default().trim().to_string(),
        to: non_blank(body.to),
        current: body.current,
        description: non_blank(body.description),
    })
}

// ═══════════════════════════════════════════════════════════════════════
// Handlers
// ═══════════════════════════════════════════════════════════════════════

async fn join_owner<U, P, B, G>(
    env: &ApiEnvironment<U, P, B, G>,
    profile: Profile,
) -> Result<Option<ProfileView>, ApiError>
where
    U: UserRepository,
    P: ProfileRepository,
    B: PostRepository,
    G: GithubClient,
{
    let owner = env.users.find_by_id(profile.user).await?;
    Ok(owner.map(|user| profile.with_owner(user.summary())))
}

/// `GET /api/profile/me` - the authenticated user's profile, owner joined.
///
/// Absent profile is a 400 with a descriptive message (the dashboard uses
/// this to prompt profile creation).
pub async fn me<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
) -> Result<Json<ProfileView>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let profile = env
        .profiles
        .find_by_owner(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::BadRequest("No profile found for this user".to_string()))?;

    join_owner(&env, profile)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// `POST /api/profile` - create-or-update the authenticated user's profile.
///
/// Builds a sparse update from the present optional fields and upserts by
/// owner reference. Calling twice with identical input stores the same
/// document.
pub async fn upsert<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
    Json(body): Json<ProfileBody>,
) -> Result<Json<Profile>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let update = validate_profile(body)?;
    let profile = env.profiles.upsert(auth.user_id, update).await?;
    tracing::info!(user_id = %auth.user_id, "profile upserted");
    Ok(Json(profile))
}

/// `GET /api/profile` - all profiles with owner summaries. Public.
///
/// Profiles whose owner record has vanished mid-cascade are skipped rather
/// than failing the whole listing.
pub async fn list<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
) -> Result<Json<Vec<ProfileView>>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let mut views = Vec::new();
    for profile in env.profiles.find_all().await? {
        if let Some(view) = join_owner(&env, profile).await? {
            views.push(view);
        }
    }
    Ok(Json(views))
}

/// `GET /api/profile/user/:user_id` - one user's profile. Public.
pub async fn by_user<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileView>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let user_id = UserId::parse(&user_id)
        .map_err(|_| ApiError::BadRequest("Profile not found".to_string()))?;

    let profile = env
        .profiles
        .find_by_owner(user_id)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Profile not found".to_string()))?;

    join_owner(&env, profile)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest("Profile not found".to_string()))
}

/// `DELETE /api/profile` - delete the authenticated account.
///
/// Cascades posts, then profile, then the user record. Not transactional:
/// a failure partway leaves the earlier deletions in place, so the order
/// runs from least to most authoritative.
pub async fn delete_account<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let removed_posts = env.posts.remove_by_author(auth.user_id).await?;
    env.profiles.remove_by_owner(auth.user_id).await?;
    env.users.remove(auth.user_id).await?;

    tracing::info!(user_id = %auth.user_id, removed_posts, "account deleted");
    Ok(Json(MessageResponse {
        msg: "User deleted".to_string(),
    }))
}

/// `PUT /api/profile/experience` - prepend a validated experience entry.
pub async fn add_experience<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
    Json(body): Json<ExperienceBody>,
) -> Result<Json<Profile>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let entry = validate_experience(body)?;

    env.profiles
        .update(auth.user_id, move |profile| {
            profile.experience.insert(0, entry);
            profile.clone()
        })
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest("No profile found for this user".to_string()))
}

/// `DELETE /api/profile/experience/:id` - remove an experience entry.
///
/// Removal is by entry id; an unknown id leaves the profile unchanged and
/// still returns it (inherited contract - no existence check).
pub async fn delete_experience<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let entry_id = EntryId::parse(&id).ok();

    env.profiles
        .update(auth.user_id, move |profile| {
            if let Some(entry_id) = entry_id {
                profile.experience.retain(|e| e.id != entry_id);
            }
            profile.clone()
        })
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest("No profile found for this user".to_string()))
}

/// `PUT /api/profile/education` - prepend a validated education entry.
pub async fn add_education<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
    Json(body): Json<EducationBody>,
) -> Result<Json<Profile>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let entry = validate_education(body)?;

    env.profiles
        .update(auth.user_id, move |profile| {
            profile.education.insert(0, entry);
            profile.clone()
        })
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest("No profile found for this user".to_string()))
}

/// `DELETE /api/profile/education/:id` - remove an education entry.
///
/// Same silent no-op contract as experience deletion.
pub async fn delete_education<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let entry_id = EntryId::parse(&id).ok();

    env.profiles
        .update(auth.user_id, move |profile| {
            if let Some(entry_id) = entry_id {
                profile.education.retain(|e| e.id != entry_id);
            }
            profile.clone()
        })
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest("No profile found for this user".to_string()))
}

/// `GET /api/profile/github/:username` - the user's five most recently
/// created public repositories. Public; a passthrough to the GitHub API.
pub async fn github_repos<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<GithubRepo>>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    match env.github.recent_repos(&username).await {
        Ok(repos) => Ok(Json(repos)),
        Err(GithubError::NotFound) => {
            Err(ApiError::NotFound("No Github profile found".to_string()))
        }
        Err(GithubError::Upstream(cause)) => {
            // Upstream trouble reads the same as an unknown profile to the
            // client; the cause stays in the logs
            tracing::warn!(%username, %cause, "GitHub listing failed");
            Err(ApiError::NotFound("No Github profile found".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skills_csv_is_split_and_trimmed() {
        let skills = SkillsField::Csv("js, go , ,rust".to_string()).into_list();
        assert_eq!(skills, vec!["js", "go", "rust"]);
    }

    #[test]
    fn skills_list_passes_through_trimmed() {
        let skills = SkillsField::List(vec![" js ".to_string(), "go".to_string()]).into_list();
        assert_eq!(skills, vec!["js", "go"]);
    }

    #[test]
    fn profile_requires_status_and_skills() {
        let err = validate_profile(ProfileBody::default());
        match err {
            Err(ApiError::Validation(errors)) => {
                let params: Vec<_> = errors.iter().filter_map(|e| e.param.as_deref()).collect();
                assert_eq!(params, vec!["status", "skills"]);
            }
            other => unreachable!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn profile_body_builds_sparse_update() {
        let update = validate_profile(ProfileBody {
            status: Some("Dev".to_string()),
            skills: Some(SkillsField::Csv("js,go".to_string())),
            bio: Some("  ".to_string()),
            twitter: Some("https://twitter.com/a".to_string()),
            ..ProfileBody::default()
        })
        .ok();

        let Some(update) = update else {
            unreachable!("body is valid");
        };
        assert_eq!(update.status, "Dev");
        assert_eq!(update.skills, vec!["js", "go"]);
        assert_eq!(update.bio, None); // blank collapses to absent
        assert_eq!(update.social.twitter.as_deref(), Some("https://twitter.com/a"));
        assert_eq!(update.social.youtube, None);
    }

    #[test]
    fn experience_requires_title_company_from() {
        let err = validate_experience(ExperienceBody::default());
        match err {
            Err(ApiError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => unreachable!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn education_accepts_legacy_field_name() {
        let body: EducationBody = serde_json::from_value(serde_json::json!({
            "school": "MIT",
            "degree": "BSc",
            "fieldofstudy": "CS",
            "from": "2019"
        }))
        .unwrap_or_default();
        let entry = validate_education(body).ok();
        assert_eq!(entry.map(|e| e.field_of_study), Some("CS".to_string()));
    }
}
