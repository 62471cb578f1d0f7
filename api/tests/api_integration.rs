//! End-to-end tests against the real router wired to in-memory stores.

#![allow(clippy::panic)]

use std::sync::Arc;

use axum_test::TestServer;
use devconnect_api::mocks::StubGithubClient;
use devconnect_api::models::{Comment, GithubRepo, Like, Post};
use devconnect_api::stores::{
    MemoryPostRepository, MemoryProfileRepository, MemoryUserRepository,
};
use devconnect_api::{api_router, ApiConfig, ApiEnvironment};
use axum::http::StatusCode;
use serde_json::{json, Value};

fn server() -> TestServer {
    server_with_github(StubGithubClient::new())
}

fn server_with_github(github: StubGithubClient) -> TestServer {
    let config = ApiConfig::development().with_jwt_secret("integration-secret");
    let env = Arc::new(ApiEnvironment::new(
        config,
        MemoryUserRepository::new(),
        MemoryProfileRepository::new(),
        MemoryPostRepository::new(),
        github,
    ));
    TestServer::new(api_router(env)).unwrap_or_else(|e| panic!("failed to start test server: {e}"))
}

async fn register(server: &TestServer, name: &str, email: &str) -> String {
    let response = server
        .post("/api/users")
        .json(&json!({ "name": name, "email": email, "password": "secret1" }))
        .await;
    response.assert_status(StatusCode::OK);
    response.json::<Value>()["token"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

// ═══════════════════════════════════════════════════════════════════════
// Registration and identity
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn register_then_fetch_identity_without_password() {
    let server = server();
    let token = register(&server, "A", "a@x.com").await;

    let response = server.get("/api/auth").authorization_bearer(&token).await;
    response.assert_status(StatusCode::OK);

    let user = response.json::<Value>();
    assert_eq!(user["name"], "A");
    assert_eq!(user["email"], "a@x.com");
    assert!(user["id"].is_string());
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_email_registration_conflicts_and_creates_nothing() {
    let server = server();
    let _ = register(&server, "A", "a@x.com").await;

    let response = server
        .post("/api/users")
        .json(&json!({ "name": "Imposter", "email": "a@x.com", "password": "secret2" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["errors"][0]["msg"], "User already exists");

    // The original account still logs in; no second user shadowed it
    let login = server
        .post("/api/auth")
        .json(&json!({ "email": "a@x.com", "password": "secret1" }))
        .await;
    login.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn registration_validation_lists_every_failure() {
    let server = server();
    let response = server
        .post("/api/users")
        .json(&json!({ "email": "nope", "password": "short" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let errors = response.json::<Value>();
    let errors = errors["errors"].as_array().cloned().unwrap_or_default();
    assert_eq!(errors.len(), 3);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let server = server();
    let _ = register(&server, "A", "a@x.com").await;

    let response = server
        .post("/api/auth")
        .json(&json!({ "email": "a@x.com", "password": "wrong!" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["msg"], "Invalid credentials");
}

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let server = server();
    let response = server.get("/api/auth").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>()["msg"],
        "No token, authorization denied"
    );
}

#[tokio::test]
async fn protected_route_with_garbage_token_is_unauthorized() {
    let server = server();
    let response = server
        .get("/api/auth")
        .authorization_bearer("not.a.token")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["msg"], "Token is not valid");
}

// ═══════════════════════════════════════════════════════════════════════
// Profiles
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn profile_upsert_splits_skills_and_is_idempotent() {
    let server = server();
    let token = register(&server, "A", "a@x.com").await;

    let body = json!({ "status": "Dev", "skills": "js,go" });
    let first = server
        .post("/api/profile")
        .authorization_bearer(&token)
        .json(&body)
        .await;
    first.assert_status(StatusCode::OK);

    let second = server
        .post("/api/profile")
        .authorization_bearer(&token)
        .json(&body)
        .await;
    second.assert_status(StatusCode::OK);

    let me = server
        .get("/api/profile/me")
        .authorization_bearer(&token)
        .await;
    me.assert_status(StatusCode::OK);
    let me = me.json::<Value>();
    assert_eq!(me["skills"], json!(["js", "go"]));
    assert_eq!(me["status"], "Dev");
    assert_eq!(me["user"]["name"], "A");
}

#[tokio::test]
async fn profile_update_keeps_omitted_fields() {
    let server = server();
    let token = register(&server, "A", "a@x.com").await;

    let _ = server
        .post("/api/profile")
        .authorization_bearer(&token)
        .json(&json!({ "status": "Dev", "skills": "js", "bio": "keeps this" }))
        .await;
    let _ = server
        .post("/api/profile")
        .authorization_bearer(&token)
        .json(&json!({ "status": "Senior Dev", "skills": "js" }))
        .await;

    let me = server
        .get("/api/profile/me")
        .authorization_bearer(&token)
        .await;
    let me = me.json::<Value>();
    assert_eq!(me["status"], "Senior Dev");
    assert_eq!(me["bio"], "keeps this");
}

#[tokio::test]
async fn missing_profile_reports_bad_request() {
    let server = server();
    let token = register(&server, "A", "a@x.com").await;

    let response = server
        .get("/api/profile/me")
        .authorization_bearer(&token)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn experience_lifecycle_add_then_targeted_delete() {
    let server = server();
    let token = register(&server, "A", "a@x.com").await;
    let _ = server
        .post("/api/profile")
        .authorization_bearer(&token)
        .json(&json!({ "status": "Dev", "skills": "js" }))
        .await;

    let add = |title: &str| {
        json!({ "title": title, "company": "Acme", "from": "2020" })
    };
    let _ = server
        .put("/api/profile/experience")
        .authorization_bearer(&token)
        .json(&add("First"))
        .await;
    let profile = server
        .put("/api/profile/experience")
        .authorization_bearer(&token)
        .json(&add("Second"))
        .await;
    profile.assert_status(StatusCode::OK);
    let profile = profile.json::<Value>();

    // Prepend order: newest first
    let experience = profile["experience"].as_array().cloned().unwrap_or_default();
    assert_eq!(experience.len(), 2);
    assert_eq!(experience[0]["title"], "Second");

    // Targeted delete removes exactly one
    let id = experience[0]["id"].as_str().unwrap_or_default().to_string();
    let after = server
        .delete(&format!("/api/profile/experience/{id}"))
        .authorization_bearer(&token)
        .await;
    after.assert_status(StatusCode::OK);
    let after = after.json::<Value>();
    let titles: Vec<_> = after["experience"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .map(|e| e["title"].clone())
        .collect();
    assert_eq!(titles, vec![json!("First")]);

    // Unknown id is a silent no-op
    let noop = server
        .delete(&format!("/api/profile/experience/{}", uuid::Uuid::new_v4()))
        .authorization_bearer(&token)
        .await;
    noop.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn public_profile_listing_needs_no_token() {
    let server = server();
    let token = register(&server, "A", "a@x.com").await;
    let _ = server
        .post("/api/profile")
        .authorization_bearer(&token)
        .json(&json!({ "status": "Dev", "skills": "js" }))
        .await;

    let listing = server.get("/api/profile").await;
    listing.assert_status(StatusCode::OK);
    let profiles = listing.json::<Vec<Value>>();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["user"]["name"], "A");
}

#[tokio::test]
async fn account_deletion_cascades_posts_and_profile() {
    let server = server();
    let token = register(&server, "A", "a@x.com").await;
    let _ = server
        .post("/api/profile")
        .authorization_bearer(&token)
        .json(&json!({ "status": "Dev", "skills": "js" }))
        .await;
    let _ = server
        .post("/api/posts")
        .authorization_bearer(&token)
        .json(&json!({ "text": "hello" }))
        .await;

    let response = server
        .delete("/api/profile")
        .authorization_bearer(&token)
        .await;
    response.assert_status(StatusCode::OK);

    // Identity, profile, and posts are all gone
    let other = register(&server, "B", "b@x.com").await;
    let me = server.get("/api/auth").authorization_bearer(&token).await;
    me.assert_status(StatusCode::NOT_FOUND);
    let profiles = server.get("/api/profile").await.json::<Vec<Value>>();
    assert!(profiles.is_empty());
    let posts = server
        .get("/api/posts")
        .authorization_bearer(&other)
        .await
        .json::<Vec<Value>>();
    assert!(posts.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════
// Posts, likes, comments
// ═══════════════════════════════════════════════════════════════════════

async fn create_post(server: &TestServer, token: &str, text: &str) -> Post {
    let response = server
        .post("/api/posts")
        .authorization_bearer(token)
        .json(&json!({ "text": text }))
        .await;
    response.assert_status(StatusCode::OK);
    response.json::<Post>()
}

#[tokio::test]
async fn post_carries_author_snapshot() {
    let server = server();
    let token = register(&server, "A", "a@x.com").await;
    let post = create_post(&server, &token, "hello world").await;

    assert_eq!(post.text, "hello world");
    assert_eq!(post.name, "A");
    assert!(post.avatar.starts_with("https://www.gravatar.com/avatar/"));
    assert!(post.likes.is_empty());
}

#[tokio::test]
async fn double_like_conflicts_and_keeps_one_entry() {
    let server = server();
    let token = register(&server, "A", "a@x.com").await;
    let post = create_post(&server, &token, "like me").await;

    let first = server
        .put(&format!("/api/posts/like/{}", post.id))
        .authorization_bearer(&token)
        .await;
    first.assert_status(StatusCode::OK);
    assert_eq!(first.json::<Vec<Like>>().len(), 1);

    let second = server
        .put(&format!("/api/posts/like/{}", post.id))
        .authorization_bearer(&token)
        .await;
    second.assert_status(StatusCode::BAD_REQUEST);

    let fetched = server
        .get(&format!("/api/posts/{}", post.id))
        .authorization_bearer(&token)
        .await
        .json::<Post>();
    assert_eq!(fetched.likes.len(), 1);
}

#[tokio::test]
async fn unlike_round_trip_excludes_the_user() {
    let server = server();
    let author = register(&server, "A", "a@x.com").await;
    let b = register(&server, "B", "b@x.com").await;
    let post = create_post(&server, &author, "toggle me").await;

    let like = server
        .put(&format!("/api/posts/like/{}", post.id))
        .authorization_bearer(&b)
        .await;
    like.assert_status(StatusCode::OK);

    let unlike = server
        .put(&format!("/api/posts/unlike/{}", post.id))
        .authorization_bearer(&b)
        .await;
    unlike.assert_status(StatusCode::OK);
    assert!(unlike.json::<Vec<Like>>().is_empty());
}

#[tokio::test]
async fn unlike_without_like_is_bad_request() {
    let server = server();
    let token = register(&server, "A", "a@x.com").await;
    let post = create_post(&server, &token, "never liked").await;

    let response = server
        .put(&format!("/api/posts/unlike/{}", post.id))
        .authorization_bearer(&token)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["msg"],
        "Post has not yet been liked"
    );
}

#[tokio::test]
async fn post_deletion_is_owner_only() {
    let server = server();
    let author = register(&server, "A", "a@x.com").await;
    let intruder = register(&server, "B", "b@x.com").await;
    let post = create_post(&server, &author, "mine").await;

    let denied = server
        .delete(&format!("/api/posts/{}", post.id))
        .authorization_bearer(&intruder)
        .await;
    denied.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(denied.json::<Value>()["msg"], "User not authorised");

    let allowed = server
        .delete(&format!("/api/posts/{}", post.id))
        .authorization_bearer(&author)
        .await;
    allowed.assert_status(StatusCode::OK);

    let gone = server
        .get(&format!("/api/posts/{}", post.id))
        .authorization_bearer(&author)
        .await;
    gone.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_deletion_checks_ownership_and_preserves_siblings() {
    let server = server();
    let author = register(&server, "A", "a@x.com").await;
    let commenter = register(&server, "B", "b@x.com").await;
    let post = create_post(&server, &author, "discuss").await;

    let comment = |token: &str, text: &str| {
        server
            .post(&format!("/api/posts/comment/{}", post.id))
            .authorization_bearer(token)
            .json(&json!({ "text": text }))
    };
    let _ = comment(&author, "first").await;
    let _ = comment(&commenter, "second").await;
    let comments = comment(&author, "third").await.json::<Vec<Comment>>();
    assert_eq!(comments.len(), 3);

    // B's comment is comments[1] ("second", prepend order: third, second, first)
    let target = comments[1].id;

    // The author of the post is not the author of the comment
    let denied = server
        .delete(&format!("/api/posts/comment/{}/{}", post.id, target))
        .authorization_bearer(&author)
        .await;
    denied.assert_status(StatusCode::UNAUTHORIZED);

    let allowed = server
        .delete(&format!("/api/posts/comment/{}/{}", post.id, target))
        .authorization_bearer(&commenter)
        .await;
    allowed.assert_status(StatusCode::OK);

    let remaining = allowed.json::<Vec<Comment>>();
    let texts: Vec<_> = remaining.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["third", "first"]);
}

#[tokio::test]
async fn posts_list_is_newest_first() {
    let server = server();
    let token = register(&server, "A", "a@x.com").await;
    let _ = create_post(&server, &token, "older").await;
    let _ = create_post(&server, &token, "newer").await;

    let posts = server
        .get("/api/posts")
        .authorization_bearer(&token)
        .await
        .json::<Vec<Post>>();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].text, "newer");
}

// ═══════════════════════════════════════════════════════════════════════
// GitHub proxy
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn github_listing_passes_through() {
    let github = StubGithubClient::new().with_repos(
        "octocat",
        vec![GithubRepo {
            name: "hello-world".to_string(),
            html_url: "https://github.com/octocat/hello-world".to_string(),
            description: None,
            stargazers_count: 42,
            forks_count: 7,
            language: Some("Rust".to_string()),
        }],
    );
    let server = server_with_github(github);

    let response = server.get("/api/profile/github/octocat").await;
    response.assert_status(StatusCode::OK);
    let repos = response.json::<Vec<GithubRepo>>();
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].name, "hello-world");
}

#[tokio::test]
async fn unknown_github_user_is_not_found() {
    let server = server();
    let response = server.get("/api/profile/github/nobody").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["msg"], "No Github profile found");
}
