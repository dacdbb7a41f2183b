//! One functional sweep over the whole API surface.
//!
//! A disposable account is created, exercised end to end (both login
//! methods, token refresh, password rotation, session churn, media, posts,
//! search) and deleted again. The first failed check aborts the sweep.
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::api::ApiClient;
use crate::api::payload::{
    AvatarUpdate, ChangePassword, EditPost, LoginAlias, LoginEmail, LoginRefresh, NewPost,
    NewUser, SearchQuery, UserInfoUpdate,
};
use crate::args::Visibility;
use crate::config::Settings;
use crate::error::{ApiError, AppResult, SmokeError};
use crate::harness::MediaPool;

/// Runs the sweep against `settings.base_url`.
///
/// # Errors
///
/// Returns the first failed check, or a validation error when the media
/// pools cannot be scanned.
pub async fn run(settings: &Settings) -> AppResult<()> {
    let client = ApiClient::new(settings.base_url.clone(), settings.timeout)?;
    let media = MediaPool::scan(&settings.audio_dir, &settings.images_dir)?;
    info!("smoke sweep against {}", settings.base_url);
    sweep(&client, &media, &settings.password).await?;
    Ok(())
}

fn check<TValue>(
    check: &'static str,
    result: Result<TValue, ApiError>,
) -> Result<TValue, SmokeError> {
    result.map_err(|source| SmokeError::Check { check, source })
}

async fn sweep(client: &ApiClient, media: &MediaPool, password: &str) -> Result<(), SmokeError> {
    // Timestamped alias so the sweep can be re-run against a live server.
    let suffix = Utc::now().timestamp();
    let alias = format!("smoke{suffix}");
    let email = format!("smoke{suffix}@example.test");
    let new_password = format!("{password}-rotated");

    info!("signup as {}", alias);
    check(
        "signup",
        client
            .signup(&NewUser {
                alias: &alias,
                email: &email,
                password,
            })
            .await,
    )?;

    info!("fetch the new profile");
    check("get user", client.user_by_alias(&alias).await)?;

    info!("login by email, then by alias");
    check(
        "login(email)",
        client
            .login_email(&LoginEmail {
                email: &email,
                password,
            })
            .await,
    )?;
    let tokens = check(
        "login(alias)",
        client
            .login_alias(&LoginAlias {
                alias: &alias,
                password,
            })
            .await,
    )?;

    info!("read the full profile");
    check("current user", client.current_user(&tokens.access_token).await)?;

    info!("rotate the password");
    check(
        "change password",
        client
            .change_password(
                &tokens.access_token,
                &ChangePassword {
                    password,
                    new_password: &new_password,
                },
            )
            .await,
    )?;

    info!("stale password must be rejected");
    match client
        .login_alias(&LoginAlias {
            alias: &alias,
            password,
        })
        .await
    {
        Ok(_tokens) => {
            return Err(SmokeError::ExpectedRejection {
                check: "stale password login",
            });
        }
        Err(source) => {
            // Only an HTTP rejection counts; a transport fault is a failure.
            if source.status().is_none() {
                return Err(SmokeError::Check {
                    check: "stale password login",
                    source,
                });
            }
        }
    }

    info!("login with the new password");
    let tokens = check(
        "login(new password)",
        client
            .login_alias(&LoginAlias {
                alias: &alias,
                password: &new_password,
            })
            .await,
    )?;

    info!("refresh-token login");
    let tokens = check(
        "login(refresh)",
        client
            .login_refresh(&LoginRefresh {
                refresh_token: &tokens.refresh_token,
            })
            .await,
    )?;

    info!("update the profile description");
    check(
        "update user",
        client
            .update_user(
                &tokens.access_token,
                &UserInfoUpdate::Description {
                    description: "stampede smoke account",
                },
            )
            .await,
    )?;

    info!("session churn: extra logins, list, purge");
    for _ in 0..3 {
        check(
            "session login",
            client
                .login_alias(&LoginAlias {
                    alias: &alias,
                    password: &new_password,
                })
                .await,
        )?;
    }
    check("sessions", client.sessions(&tokens.access_token).await)?;
    check(
        "purge sessions",
        client.purge_sessions(&tokens.access_token).await,
    )?;
    let tokens = check(
        "login(after purge)",
        client
            .login_alias(&LoginAlias {
                alias: &alias,
                password: &new_password,
            })
            .await,
    )?;

    info!("upload media and claim it");
    let avatar_key = upload_from_pool(
        client,
        &tokens.access_token,
        "avatar image upload",
        media.pick_image(),
    )
    .await?;
    check(
        "media claim",
        client.media_claim(&tokens.access_token, &avatar_key).await,
    )?;
    check(
        "update avatar",
        client
            .update_avatar(&tokens.access_token, &AvatarUpdate { key: &avatar_key })
            .await,
    )?;

    info!("create, read, edit and delete a post");
    let photo_key = upload_from_pool(
        client,
        &tokens.access_token,
        "post image upload",
        media.pick_image(),
    )
    .await?;
    let audio_key = upload_from_pool(
        client,
        &tokens.access_token,
        "post audio upload",
        media.pick_audio(),
    )
    .await?;
    let created = check(
        "create post",
        client
            .create_post(
                &tokens.access_token,
                &NewPost {
                    title: "Smoke post",
                    caption: "created by the smoke sweep",
                    photo: &photo_key,
                    audio: &audio_key,
                    visibility: Visibility::Public,
                },
            )
            .await,
    )?;
    let post_id = created.post_id.ok_or(SmokeError::Check {
        check: "create post",
        source: ApiError::MissingField {
            endpoint: "create post",
            field: "post_id",
        },
    })?;
    check(
        "get post",
        client.get_post(&tokens.access_token, &post_id).await,
    )?;
    check("posts by user", client.posts_by_user(&alias).await)?;
    check(
        "edit post",
        client
            .edit_post(
                &tokens.access_token,
                &post_id,
                &EditPost {
                    visibility: Visibility::Private,
                },
            )
            .await,
    )?;

    info!("search");
    let date = Utc::now().to_rfc3339();
    check(
        "search",
        client
            .search(&SearchQuery {
                text: "Smoke",
                user_drop: 0,
                user_get: 10,
                post_drop: 0,
                post_get: 10,
                date: &date,
            })
            .await,
    )?;

    info!("delete the post and the account");
    check(
        "delete post",
        client.delete_post(&tokens.access_token, &post_id).await,
    )?;
    check("delete user", client.delete_user(&tokens.access_token).await)?;

    info!("smoke sweep passed");
    Ok(())
}

async fn upload_from_pool(
    client: &ApiClient,
    token: &str,
    check_name: &'static str,
    path: Option<&Path>,
) -> Result<String, SmokeError> {
    let path = path.ok_or(SmokeError::EmptyPool { check: check_name })?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| SmokeError::MediaRead {
            check: check_name,
            path: path.to_path_buf(),
            source,
        })?;
    let receipt = check(check_name, client.upload_media(token, bytes).await)?;
    Ok(receipt.key)
}
