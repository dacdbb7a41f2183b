use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::ApiError;

use super::payload::{
    AvatarUpdate, ChangePassword, EditPost, LoginAlias, LoginEmail, LoginRefresh, NewPost,
    NewUser, SearchQuery, UserInfoUpdate,
};
use super::response::{ApiMessage, MediaUploaded, PostCreated, TokenResponse};

/// Typed client over the backend's REST surface.
///
/// One instance is shared by every workflow; reqwest pools connections
/// internally, so clones are cheap and concurrent use is fine.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Builds a client with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|source| ApiError::BuildClientFailed { source })?;
        Ok(Self { http, base })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|source| ApiError::Url {
            path: path.to_owned(),
            source,
        })
    }

    fn post_json<TBody>(&self, url: Url, token: Option<&str>, body: &TBody) -> RequestBuilder
    where
        TBody: Serialize,
    {
        let builder = self.http.post(url).json(body);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when the API rejects the signup, e.g.
    /// with 409 when the alias is already taken.
    pub async fn signup(&self, user: &NewUser<'_>) -> Result<ApiMessage, ApiError> {
        let url = self.url("/api/users/auth/signup")?;
        send_json("signup", self.post_json(url, None, user)).await
    }

    /// Logs in with an alias and password.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when the credentials are rejected.
    pub async fn login_alias(&self, login: &LoginAlias<'_>) -> Result<TokenResponse, ApiError> {
        let url = self.url("/api/users/auth/login")?;
        let builder = self.post_json(url, None, login).query(&[("using", "alias")]);
        send_json("login(alias)", builder).await
    }

    /// Logs in with an email and password.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when the credentials are rejected.
    pub async fn login_email(&self, login: &LoginEmail<'_>) -> Result<TokenResponse, ApiError> {
        let url = self.url("/api/users/auth/login")?;
        let builder = self.post_json(url, None, login).query(&[("using", "email")]);
        send_json("login(email)", builder).await
    }

    /// Trades a refresh token for a fresh token pair.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when the token has been revoked.
    pub async fn login_refresh(
        &self,
        login: &LoginRefresh<'_>,
    ) -> Result<TokenResponse, ApiError> {
        let url = self.url("/api/users/auth/login")?;
        let builder = self
            .post_json(url, None, login)
            .query(&[("using", "refresh_token")]);
        send_json("login(refresh)", builder).await
    }

    /// Public profile lookup, no authentication.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when no such alias exists.
    pub async fn user_by_alias(&self, alias: &str) -> Result<Value, ApiError> {
        let url = self.url(&format!("/api/users/{alias}"))?;
        send_json("get user", self.http.get(url)).await
    }

    /// Full profile of the authenticated user.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when the token is not accepted.
    pub async fn current_user(&self, token: &str) -> Result<Value, ApiError> {
        let url = self.url("/api/users/")?;
        send_json("current user", self.http.get(url).bearer_auth(token)).await
    }

    /// # Errors
    ///
    /// Fails on transport faults or when the old password does not match.
    pub async fn change_password(
        &self,
        token: &str,
        change: &ChangePassword<'_>,
    ) -> Result<ApiMessage, ApiError> {
        let url = self.url("/api/users/update/password")?;
        send_json("change password", self.post_json(url, Some(token), change)).await
    }

    /// # Errors
    ///
    /// Fails on transport faults or when the update is rejected.
    pub async fn update_user(
        &self,
        token: &str,
        update: &UserInfoUpdate<'_>,
    ) -> Result<ApiMessage, ApiError> {
        let url = self.url("/api/users/update")?;
        send_json("update user", self.post_json(url, Some(token), update)).await
    }

    /// Points the account avatar at a previously uploaded media key.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when the key has already expired.
    pub async fn update_avatar(
        &self,
        token: &str,
        avatar: &AvatarUpdate<'_>,
    ) -> Result<ApiMessage, ApiError> {
        let url = self.url("/api/users/update/avatar")?;
        send_json("update avatar", self.post_json(url, Some(token), avatar)).await
    }

    /// Deletes the authenticated account.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when the token is not accepted.
    pub async fn delete_user(&self, token: &str) -> Result<ApiMessage, ApiError> {
        let url = self.url("/api/users/")?;
        send_json("delete user", self.http.delete(url).bearer_auth(token)).await
    }

    /// Posts visible on a user's public page.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when no such alias exists.
    pub async fn posts_by_user(&self, alias: &str) -> Result<Value, ApiError> {
        let url = self.url(&format!("/api/users/{alias}/posts"))?;
        send_json("posts by user", self.http.get(url)).await
    }

    /// Uploads one media file as a raw byte body and returns its claim key.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when the server rejects the file.
    pub async fn upload_media(
        &self,
        token: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaUploaded, ApiError> {
        let url = self.url("/api/media/upload")?;
        let builder = self
            .http
            .post(url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes);
        send_json("media upload", builder).await
    }

    /// Looks up an uploaded media entry by key.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when the key is unknown or expired.
    pub async fn media_claim(&self, token: &str, key: &str) -> Result<Value, ApiError> {
        let url = self.url(&format!("/api/media/{key}"))?;
        send_json("media claim", self.http.get(url).bearer_auth(token)).await
    }

    /// Creates a post claiming two uploaded media keys.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when a referenced key is invalid.
    pub async fn create_post(
        &self,
        token: &str,
        post: &NewPost<'_>,
    ) -> Result<PostCreated, ApiError> {
        let url = self.url("/api/posts/new")?;
        send_json("create post", self.post_json(url, Some(token), post)).await
    }

    /// # Errors
    ///
    /// Fails on transport faults or when the post is not visible to the
    /// caller.
    pub async fn get_post(&self, token: &str, id: &str) -> Result<Value, ApiError> {
        let url = self.url(&format!("/api/posts/{id}"))?;
        send_json("get post", self.http.get(url).bearer_auth(token)).await
    }

    /// # Errors
    ///
    /// Fails on transport faults or when the caller does not own the post.
    pub async fn edit_post(
        &self,
        token: &str,
        id: &str,
        edit: &EditPost,
    ) -> Result<ApiMessage, ApiError> {
        let url = self.url(&format!("/api/posts/{id}"))?;
        let builder = self.http.patch(url).bearer_auth(token).json(edit);
        send_json("edit post", builder).await
    }

    /// # Errors
    ///
    /// Fails on transport faults or when the caller does not own the post.
    pub async fn delete_post(&self, token: &str, id: &str) -> Result<ApiMessage, ApiError> {
        let url = self.url(&format!("/api/posts/{id}"))?;
        send_json("delete post", self.http.delete(url).bearer_auth(token)).await
    }

    /// Lists the account's active sessions.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when the token is not accepted.
    pub async fn sessions(&self, token: &str) -> Result<Value, ApiError> {
        let url = self.url("/api/sessions/")?;
        send_json("sessions", self.http.get(url).bearer_auth(token)).await
    }

    /// Revokes every session of the account, including the current one.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when the token is not accepted.
    pub async fn purge_sessions(&self, token: &str) -> Result<Value, ApiError> {
        let url = self.url("/api/sessions/delete")?;
        send_json("purge sessions", self.http.post(url).bearer_auth(token)).await
    }

    /// Free-text search over users and posts.
    ///
    /// # Errors
    ///
    /// Fails on transport faults or when the query is rejected.
    pub async fn search(&self, query: &SearchQuery<'_>) -> Result<Value, ApiError> {
        let url = self.url("/api/search")?;
        let builder = self.http.get(url).query(&query.as_params());
        send_json("search", builder).await
    }
}

async fn send_json<TResponse>(
    endpoint: &'static str,
    builder: RequestBuilder,
) -> Result<TResponse, ApiError>
where
    TResponse: DeserializeOwned,
{
    let response = builder
        .send()
        .await
        .map_err(|source| ApiError::Transport { endpoint, source })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiMessage>(&body)
            .ok()
            .and_then(|ack| ack.message)
            .unwrap_or(body);
        return Err(ApiError::Status {
            endpoint,
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|source| ApiError::Decode { endpoint, source })
}
