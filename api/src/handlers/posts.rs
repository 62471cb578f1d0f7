//! Post handlers: create, list, fetch, delete, like/unlike, comments.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use devconnect_web::FieldError;
use serde::{Deserialize, Serialize};

use crate::environment::ApiEnvironment;
use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::handlers::present;
use crate::models::{Comment, EntryId, Like, Post, PostId, User};
use crate::providers::{GithubClient, PostRepository, ProfileRepository, UserRepository};

/// Body for creating a post or a comment - just the text.
#[derive(Debug, Clone, Deserialize)]
pub struct TextBody {
    /// Post or comment text. Required.
    #[serde(default)]
    pub text: Option<String>,
}

/// Confirmation message body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub msg: String,
}

fn validate_text(body: &TextBody) -> Result<String, ApiError> {
    if present(body.text.as_ref()) {
        Ok(body.text.clone().unwrap_or_default())
    } else {
        Err(ApiError::Validation(vec![FieldError::new(
            "text",
            "Text is required",
        )]))
    }
}

fn parse_post_id(id: &str) -> Result<PostId, ApiError> {
    PostId::parse(id).map_err(|_| ApiError::NotFound("Post not found".to_string()))
}

async fn author_snapshot<U, P, B, G>(
    env: &ApiEnvironment<U, P, B, G>,
    auth: AuthUser,
) -> Result<User, ApiError>
where
    U: UserRepository,
    P: ProfileRepository,
    B: PostRepository,
    G: GithubClient,
{
    env.users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// `POST /api/posts` - create a post.
///
/// The author's name and avatar are denormalized onto the post at creation
/// time, so later account changes do not rewrite history.
pub async fn create<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
    Json(body): Json<TextBody>,
) -> Result<Json<Post>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let text = validate_text(&body)?;
    let user = author_snapshot(&env, auth).await?;

    let post = Post {
        id: PostId::new(),
        user: user.id,
        text,
        name: user.name,
        avatar: user.avatar,
        likes: Vec::new(),
        comments: Vec::new(),
        date: Utc::now(),
    };

    let post = env.posts.insert(post).await?;
    tracing::info!(post_id = %post.id, "post created");
    Ok(Json(post))
}

/// `GET /api/posts` - all posts, newest first.
pub async fn list<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    _auth: AuthUser,
) -> Result<Json<Vec<Post>>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    Ok(Json(env.posts.find_all().await?))
}

/// `GET /api/posts/:id` - one post.
///
/// A malformed id is indistinguishable from an absent one: both 404.
pub async fn get<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let id = parse_post_id(&id)?;
    let post = env
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;
    Ok(Json(post))
}

/// `DELETE /api/posts/:id` - delete a post, owner only.
pub async fn delete<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let id = parse_post_id(&id)?;
    let post = env
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    if post.user != auth.user_id {
        return Err(ApiError::OwnershipViolation(
            "User not authorised".to_string(),
        ));
    }

    env.posts.remove(id).await?;
    tracing::info!(post_id = %id, "post deleted");
    Ok(Json(MessageResponse {
        msg: "Post removed".to_string(),
    }))
}

/// `PUT /api/posts/like/:id` - like a post.
///
/// At most one like per user per post; a second like is a conflict. The
/// membership check and the insert run atomically under the document lock.
pub async fn like<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let id = parse_post_id(&id)?;
    let result = env
        .posts
        .update(id, |post| {
            if post.likes.iter().any(|l| l.user == auth.user_id) {
                return Err(ApiError::Conflict("Post already liked".to_string()));
            }
            post.likes.insert(0, Like { user: auth.user_id });
            Ok(post.likes.clone())
        })
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    result.map(Json)
}

/// `PUT /api/posts/unlike/:id` - remove a like.
///
/// Unliking a never-liked post is a bad request, not a no-op.
pub async fn unlike<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let id = parse_post_id(&id)?;
    let result = env
        .posts
        .update(id, |post| {
            if !post.likes.iter().any(|l| l.user == auth.user_id) {
                return Err(ApiError::BadRequest(
                    "Post has not yet been liked".to_string(),
                ));
            }
            post.likes.retain(|l| l.user != auth.user_id);
            Ok(post.likes.clone())
        })
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    result.map(Json)
}

/// `POST /api/posts/comment/:id` - add a comment.
///
/// Prepends a comment with a fresh id and the commenter's name/avatar
/// snapshot; returns the updated comment list.
pub async fn add_comment<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<TextBody>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let post_id = parse_post_id(&id)?;
    let text = validate_text(&body)?;
    let user = author_snapshot(&env, auth).await?;

    let comment = Comment {
        id: EntryId::new(),
        user: user.id,
        text,
        name: user.name,
        avatar: user.avatar,
        date: Utc::now(),
    };

    let comments = env
        .posts
        .update(post_id, move |post| {
            post.comments.insert(0, comment);
            post.comments.clone()
        })
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(comments))
}

/// `DELETE /api/posts/comment/:post_id/:comment_id` - remove a comment.
///
/// Lookup is by comment id; removal is by id too (by value, not position),
/// so concurrent reordering cannot delete the wrong sibling. Owner only.
pub async fn remove_comment<U, P, B, G>(
    State(env): State<Arc<ApiEnvironment<U, P, B, G>>>,
    auth: AuthUser,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    let post_id = parse_post_id(&post_id)?;
    let comment_id = EntryId::parse(&comment_id)
        .map_err(|_| ApiError::NotFound("Comment does not exist".to_string()))?;

    let result = env
        .posts
        .update(post_id, move |post| {
            let Some(comment) = post.comments.iter().find(|c| c.id == comment_id) else {
                return Err(ApiError::NotFound("Comment does not exist".to_string()));
            };

            if comment.user != auth.user_id {
                return Err(ApiError::OwnershipViolation(
                    "User not authorised".to_string(),
                ));
            }

            post.comments.retain(|c| c.id != comment_id);
            Ok(post.comments.clone())
        })
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    result.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_validation_rejects_blank() {
        assert!(validate_text(&TextBody { text: None }).is_err());
        assert!(validate_text(&TextBody {
            text: Some("  ".to_string())
        })
        .is_err());
        assert_eq!(
            validate_text(&TextBody {
                text: Some("hello".to_string())
            })
            .ok(),
            Some("hello".to_string())
        );
    }

    #[test]
    fn malformed_post_id_maps_to_not_found() {
        assert!(matches!(
            parse_post_id("not-a-uuid"),
            Err(ApiError::NotFound(_))
        ));
    }
}
