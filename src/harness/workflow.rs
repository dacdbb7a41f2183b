use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::api::payload::{LoginAlias, NewPost, NewUser};
use crate::error::ApiError;

use super::driver::RunContext;

/// Account identity derived from a workflow id. Distinct ids never collide,
/// which keeps concurrent signups independent of each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub alias: String,
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn for_index(index: u64, password: &str) -> Self {
        Self {
            alias: format!("user{index}"),
            email: format!("{index}@example.test"),
            password: password.to_owned(),
        }
    }
}

/// Outcome of one simulated user journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Success,
    Failure { reason: String },
}

impl WorkflowOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, WorkflowOutcome::Success)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    pub id: u64,
    /// Posts successfully created before the workflow finished or failed.
    pub posts_created: u32,
    pub outcome: WorkflowOutcome,
}

impl WorkflowReport {
    pub(crate) const fn failed(id: u64, posts_created: u32, reason: String) -> Self {
        Self {
            id,
            posts_created,
            outcome: WorkflowOutcome::Failure { reason },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaKind {
    Audio,
    Image,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
        };
        formatter.write_str(label)
    }
}

/// Any fault inside a workflow ends up here and becomes the workflow's
/// failure reason; nothing propagates to the driver.
#[derive(Debug, Error)]
enum WorkflowError {
    #[error("signup failed: {0}")]
    Signup(ApiError),
    #[error("login failed: {0}")]
    Login(ApiError),
    #[error("media upload failed: no {kind} files available")]
    EmptyPool { kind: MediaKind },
    #[error("media upload failed: could not read '{path}': {source}")]
    MediaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("media upload failed: {kind} upload on iteration {iteration}: {source}")]
    Upload {
        kind: MediaKind,
        iteration: u32,
        #[source]
        source: ApiError,
    },
    #[error("post creation failed on iteration {iteration}: {source}")]
    Post {
        iteration: u32,
        #[source]
        source: ApiError,
    },
}

/// Runs one simulated user end to end: signup, login, then
/// `ctx.iterations` rounds of two uploads plus one post.
pub(super) async fn run(ctx: &RunContext, id: u64) -> WorkflowReport {
    let mut posts_created: u32 = 0;
    match execute(ctx, id, &mut posts_created).await {
        Ok(()) => WorkflowReport {
            id,
            posts_created,
            outcome: WorkflowOutcome::Success,
        },
        Err(err) => {
            debug!(workflow = id, "{err}");
            WorkflowReport::failed(id, posts_created, err.to_string())
        }
    }
}

async fn execute(ctx: &RunContext, id: u64, posts_created: &mut u32) -> Result<(), WorkflowError> {
    let credentials = Credentials::for_index(id, &ctx.password);

    // A duplicate alias is a legitimate failure to surface, not something to
    // retry around.
    ctx.client
        .signup(&NewUser {
            alias: &credentials.alias,
            email: &credentials.email,
            password: &credentials.password,
        })
        .await
        .map_err(WorkflowError::Signup)?;

    let tokens = ctx
        .client
        .login_alias(&LoginAlias {
            alias: &credentials.alias,
            password: &credentials.password,
        })
        .await
        .map_err(WorkflowError::Login)?;

    for iteration in 0..ctx.iterations {
        let audio_path = ctx
            .media
            .pick_audio()
            .ok_or(WorkflowError::EmptyPool {
                kind: MediaKind::Audio,
            })?
            .to_path_buf();
        let image_path = ctx
            .media
            .pick_image()
            .ok_or(WorkflowError::EmptyPool {
                kind: MediaKind::Image,
            })?
            .to_path_buf();

        let audio_key = upload(
            ctx,
            &tokens.access_token,
            MediaKind::Audio,
            &audio_path,
            iteration,
        )
        .await?;
        let image_key = upload(
            ctx,
            &tokens.access_token,
            MediaKind::Image,
            &image_path,
            iteration,
        )
        .await?;

        let title = format!("Sample{id}");
        let caption = format!(
            "Test caption {} and {}",
            audio_path.display(),
            image_path.display()
        );
        ctx.client
            .create_post(
                &tokens.access_token,
                &NewPost {
                    title: &title,
                    caption: &caption,
                    photo: &image_key,
                    audio: &audio_key,
                    visibility: ctx.visibility,
                },
            )
            .await
            .map_err(|source| WorkflowError::Post { iteration, source })?;
        *posts_created = posts_created.saturating_add(1);
    }

    Ok(())
}

async fn upload(
    ctx: &RunContext,
    token: &str,
    kind: MediaKind,
    path: &Path,
    iteration: u32,
) -> Result<String, WorkflowError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| WorkflowError::MediaRead {
            path: path.to_path_buf(),
            source,
        })?;
    let receipt = ctx
        .client
        .upload_media(token, bytes)
        .await
        .map_err(|source| WorkflowError::Upload {
            kind,
            iteration,
            source,
        })?;
    Ok(receipt.key)
}
