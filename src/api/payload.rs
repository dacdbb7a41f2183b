//! Request bodies for the target API.
//!
//! All payloads serialize through serde so arbitrary user text (captions,
//! passwords, search strings) is always escaped correctly on the wire.
use serde::Serialize;

use crate::args::Visibility;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewUser<'req> {
    pub alias: &'req str,
    pub email: &'req str,
    pub password: &'req str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginAlias<'req> {
    pub alias: &'req str,
    pub password: &'req str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginEmail<'req> {
    pub email: &'req str,
    pub password: &'req str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginRefresh<'req> {
    pub refresh_token: &'req str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChangePassword<'req> {
    pub password: &'req str,
    pub new_password: &'req str,
}

/// Partial user-info update; the backend takes one field at a time.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum UserInfoUpdate<'req> {
    Email { email: &'req str },
    Description { description: &'req str },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AvatarUpdate<'req> {
    pub key: &'req str,
}

/// A new post referencing two previously uploaded media keys.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewPost<'req> {
    pub title: &'req str,
    pub caption: &'req str,
    pub photo: &'req str,
    pub audio: &'req str,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct EditPost {
    pub visibility: Visibility,
}

/// Query string for `GET /api/search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery<'req> {
    pub text: &'req str,
    pub user_drop: u32,
    pub user_get: u32,
    pub post_drop: u32,
    pub post_get: u32,
    pub date: &'req str,
}

impl SearchQuery<'_> {
    pub(crate) fn as_params(&self) -> [(&'static str, String); 6] {
        [
            ("s", self.text.to_owned()),
            ("user.drop", self.user_drop.to_string()),
            ("user.get", self.user_get.to_string()),
            ("post.drop", self.post_drop.to_string()),
            ("post.get", self.post_get.to_string()),
            ("date", self.date.to_owned()),
        ]
    }
}
