//! HTTP gateway backed by `reqwest`.
//!
//! Attaches the persisted bearer token to authenticated calls and
//! translates every failure into [`ApiFailure`] - transport errors, error
//! bodies, and validation lists alike.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::actions::{EducationForm, ExperienceForm, ProfileForm};
use crate::gateway::{ApiFailure, ApiGateway, GatewayResult};
use crate::state::{CommentData, CurrentUser, LikeData, PostData, ProfileData, RepoData};
use crate::token_cache::TokenCache;

#[derive(Debug, Deserialize)]
struct TokenPayload {
    token: String,
}

/// Gateway implementation that talks to a live devconnect API.
#[derive(Clone)]
pub struct HttpGateway<T>
where
    T: TokenCache + Clone,
{
    client: reqwest::Client,
    base_url: String,
    tokens: T,
}

impl<T> HttpGateway<T>
where
    T: TokenCache + Clone + 'static,
{
    /// Create a gateway rooted at `base_url` (no trailing slash needed).
    #[must_use]
    pub fn new(base_url: impl Into<String>, tokens: T) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Start a request with the stored token attached, when one exists.
    async fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, self.url(path));
        if let Some(token) = self.tokens.load().await {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send and decode a JSON response, translating failures.
    async fn expect_json<R: DeserializeOwned>(
        builder: reqwest::RequestBuilder,
    ) -> GatewayResult<R> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiFailure::transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<R>()
                .await
                .map_err(|e| ApiFailure::transport(format!("invalid response body: {e}")))
        } else {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            Err(failure_from_body(status.as_u16(), status_text(status), &body))
        }
    }

    /// Send a request where only success matters.
    async fn expect_ok(builder: reqwest::RequestBuilder) -> GatewayResult<()> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiFailure::transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            Err(failure_from_body(status.as_u16(), status_text(status), &body))
        }
    }
}

fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown Error")
        .to_string()
}

/// Build an [`ApiFailure`] from an error body.
///
/// `{"errors": [{msg, ..}]}` fills the validation list; `{"msg": ...}`
/// overrides the message; anything else keeps the status text.
fn failure_from_body(status: u16, status_text: String, body: &Value) -> ApiFailure {
    let errors = body["errors"]
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|entry| entry["msg"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let message = body["msg"]
        .as_str()
        .map_or(status_text, str::to_string);

    ApiFailure {
        status,
        message,
        errors,
    }
}

impl<T> ApiGateway for HttpGateway<T>
where
    T: TokenCache + Clone + 'static,
{
    fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> impl Future<Output = GatewayResult<String>> + Send {
        let this = self.clone();
        async move {
            let builder = this
                .request(reqwest::Method::POST, "/api/users")
                .await
                .json(&json!({ "name": name, "email": email, "password": password }));
            Self::expect_json::<TokenPayload>(builder)
                .await
                .map(|payload| payload.token)
        }
    }

    fn login(
        &self,
        email: String,
        password: String,
    ) -> impl Future<Output = GatewayResult<String>> + Send {
        let this = self.clone();
        async move {
            let builder = this
                .request(reqwest::Method::POST, "/api/auth")
                .await
                .json(&json!({ "email": email, "password": password }));
            Self::expect_json::<TokenPayload>(builder)
                .await
                .map(|payload| payload.token)
        }
    }

    fn current_user(&self) -> impl Future<Output = GatewayResult<CurrentUser>> + Send {
        let this = self.clone();
        async move {
            let builder = this.request(reqwest::Method::GET, "/api/auth").await;
            Self::expect_json(builder).await
        }
    }

    fn my_profile(&self) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        let this = self.clone();
        async move {
            let builder = this.request(reqwest::Method::GET, "/api/profile/me").await;
            Self::expect_json(builder).await
        }
    }

    fn profiles(&self) -> impl Future<Output = GatewayResult<Vec<ProfileData>>> + Send {
        let this = self.clone();
        async move {
            let builder = this.request(reqwest::Method::GET, "/api/profile").await;
            Self::expect_json(builder).await
        }
    }

    fn profile_by_user(
        &self,
        user_id: String,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        let this = self.clone();
        async move {
            let path = format!("/api/profile/user/{user_id}");
            let builder = this.request(reqwest::Method::GET, &path).await;
            Self::expect_json(builder).await
        }
    }

    fn github_repos(
        &self,
        username: String,
    ) -> impl Future<Output = GatewayResult<Vec<RepoData>>> + Send {
        let this = self.clone();
        async move {
            let path = format!("/api/profile/github/{username}");
            let builder = this.request(reqwest::Method::GET, &path).await;
            Self::expect_json(builder).await
        }
    }

    fn save_profile(
        &self,
        form: ProfileForm,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        let this = self.clone();
        async move {
            let builder = this
                .request(reqwest::Method::POST, "/api/profile")
                .await
                .json(&form);
            Self::expect_json(builder).await
        }
    }

    fn add_experience(
        &self,
        form: ExperienceForm,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        let this = self.clone();
        async move {
            let builder = this
                .request(reqwest::Method::PUT, "/api/profile/experience")
                .await
                .json(&form);
            Self::expect_json(builder).await
        }
    }

    fn add_education(
        &self,
        form: EducationForm,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        let this = self.clone();
        async move {
            let builder = this
                .request(reqwest::Method::PUT, "/api/profile/education")
                .await
                .json(&form);
            Self::expect_json(builder).await
        }
    }

    fn delete_experience(
        &self,
        id: String,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        let this = self.clone();
        async move {
            let path = format!("/api/profile/experience/{id}");
            let builder = this.request(reqwest::Method::DELETE, &path).await;
            Self::expect_json(builder).await
        }
    }

    fn delete_education(
        &self,
        id: String,
    ) -> impl Future<Output = GatewayResult<ProfileData>> + Send {
        let this = self.clone();
        async move {
            let path = format!("/api/profile/education/{id}");
            let builder = this.request(reqwest::Method::DELETE, &path).await;
            Self::expect_json(builder).await
        }
    }

    fn delete_account(&self) -> impl Future<Output = GatewayResult<()>> + Send {
        let this = self.clone();
        async move {
            let builder = this.request(reqwest::Method::DELETE, "/api/profile").await;
            Self::expect_ok(builder).await
        }
    }

    fn posts(&self) -> impl Future<Output = GatewayResult<Vec<PostData>>> + Send {
        let this = self.clone();
        async move {
            let builder = this.request(reqwest::Method::GET, "/api/posts").await;
            Self::expect_json(builder).await
        }
    }

    fn post(&self, id: String) -> impl Future<Output = GatewayResult<PostData>> + Send {
        let this = self.clone();
        async move {
            let path = format!("/api/posts/{id}");
            let builder = this.request(reqwest::Method::GET, &path).await;
            Self::expect_json(builder).await
        }
    }

    fn create_post(&self, text: String) -> impl Future<Output = GatewayResult<PostData>> + Send {
        let this = self.clone();
        async move {
            let builder = this
                .request(reqwest::Method::POST, "/api/posts")
                .await
                .json(&json!({ "text": text }));
            Self::expect_json(builder).await
        }
    }

    fn delete_post(&self, id: String) -> impl Future<Output = GatewayResult<()>> + Send {
        let this = self.clone();
        async move {
            let path = format!("/api/posts/{id}");
            let builder = this.request(reqwest::Method::DELETE, &path).await;
            Self::expect_ok(builder).await
        }
    }

    fn like_post(&self, id: String) -> impl Future<Output = GatewayResult<Vec<LikeData>>> + Send {
        let this = self.clone();
        async move {
            let path = format!("/api/posts/like/{id}");
            let builder = this.request(reqwest::Method::PUT, &path).await;
            Self::expect_json(builder).await
        }
    }

    fn unlike_post(
        &self,
        id: String,
    ) -> impl Future<Output = GatewayResult<Vec<LikeData>>> + Send {
        let this = self.clone();
        async move {
            let path = format!("/api/posts/unlike/{id}");
            let builder = this.request(reqwest::Method::PUT, &path).await;
            Self::expect_json(builder).await
        }
    }

    fn add_comment(
        &self,
        post_id: String,
        text: String,
    ) -> impl Future<Output = GatewayResult<Vec<CommentData>>> + Send {
        let this = self.clone();
        async move {
            let path = format!("/api/posts/comment/{post_id}");
            let builder = this
                .request(reqwest::Method::POST, &path)
                .await
                .json(&json!({ "text": text }));
            Self::expect_json(builder).await
        }
    }

    fn delete_comment(
        &self,
        post_id: String,
        comment_id: String,
    ) -> impl Future<Output = GatewayResult<Vec<CommentData>>> + Send {
        let this = self.clone();
        async move {
            let path = format!("/api/posts/comment/{post_id}/{comment_id}");
            let builder = this.request(reqwest::Method::DELETE, &path).await;
            Self::expect_json(builder).await
        }
    }
}
