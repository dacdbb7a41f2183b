//! Typed response shapes for the endpoints whose fields the harness consumes.
//! Informational reads (user profiles, posts, search results) stay untyped
//! JSON; the harness only prints or forwards them.
use serde::Deserialize;

/// Bearer token pair issued at login. The access token authorizes follow-up
/// calls; the refresh token re-issues a new pair without a password.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// `{status, message}` acknowledgement most mutating endpoints return.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Receipt for an uploaded media file. The key must be claimed by a post
/// before the server-side TTL expires.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaUploaded {
    pub key: String,
    #[serde(rename = "TTL", default)]
    pub ttl: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostCreated {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub post_id: Option<String>,
}
