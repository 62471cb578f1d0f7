//! Router composition.
//!
//! Composes all resource handlers into a single Axum router. Protection is
//! per-handler: routes taking the [`crate::extract::AuthUser`] extractor
//! require a valid bearer token, the rest are public.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use devconnect_web::correlation_id_layer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::environment::ApiEnvironment;
use crate::handlers::{posts, profile, session, users};
use crate::providers::{GithubClient, PostRepository, ProfileRepository, UserRepository};

/// Create the API router.
///
/// # Routes
///
/// | Method | Path | Auth |
/// |---|---|---|
/// | POST | `/api/users` | none |
/// | POST / GET | `/api/auth` | none / bearer |
/// | GET / POST | `/api/posts` | bearer |
/// | GET / DELETE | `/api/posts/:id` | bearer |
/// | PUT | `/api/posts/like/:id`, `/api/posts/unlike/:id` | bearer |
/// | POST | `/api/posts/comment/:id` | bearer |
/// | DELETE | `/api/posts/comment/:post_id/:comment_id` | bearer |
/// | GET | `/api/profile/me` | bearer |
/// | POST / DELETE | `/api/profile` | bearer |
/// | GET | `/api/profile`, `/api/profile/user/:id`, `/api/profile/github/:username` | none |
/// | PUT / DELETE | `/api/profile/experience[/:id]`, `/api/profile/education[/:id]` | bearer |
#[allow(clippy::too_many_lines)]
pub fn api_router<U, P, B, G>(env: Arc<ApiEnvironment<U, P, B, G>>) -> Router
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    B: PostRepository + 'static,
    G: GithubClient + 'static,
{
    Router::new()
        // Users
        .route("/api/users", post(users::register::<U, P, B, G>))
        // Session
        .route(
            "/api/auth",
            post(session::login::<U, P, B, G>).get(session::current_user::<U, P, B, G>),
        )
        // Posts
        .route(
            "/api/posts",
            post(posts::create::<U, P, B, G>).get(posts::list::<U, P, B, G>),
        )
        .route(
            "/api/posts/:id",
            get(posts::get::<U, P, B, G>).delete(posts::delete::<U, P, B, G>),
        )
        .route("/api/posts/like/:id", put(posts::like::<U, P, B, G>))
        .route("/api/posts/unlike/:id", put(posts::unlike::<U, P, B, G>))
        .route(
            "/api/posts/comment/:post_id",
            post(posts::add_comment::<U, P, B, G>),
        )
        .route(
            "/api/posts/comment/:post_id/:comment_id",
            delete(posts::remove_comment::<U, P, B, G>),
        )
        // Profiles
        .route("/api/profile/me", get(profile::me::<U, P, B, G>))
        .route(
            "/api/profile",
            post(profile::upsert::<U, P, B, G>)
                .get(profile::list::<U, P, B, G>)
                .delete(profile::delete_account::<U, P, B, G>),
        )
        .route(
            "/api/profile/user/:user_id",
            get(profile::by_user::<U, P, B, G>),
        )
        .route(
            "/api/profile/experience",
            put(profile::add_experience::<U, P, B, G>),
        )
        .route(
            "/api/profile/experience/:id",
            delete(profile::delete_experience::<U, P, B, G>),
        )
        .route(
            "/api/profile/education",
            put(profile::add_education::<U, P, B, G>),
        )
        .route(
            "/api/profile/education/:id",
            delete(profile::delete_education::<U, P, B, G>),
        )
        .route(
            "/api/profile/github/:username",
            get(profile::github_repos::<U, P, B, G>),
        )
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(env)
}
