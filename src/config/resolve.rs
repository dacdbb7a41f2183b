use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::args::parsers::parse_duration_arg;
use crate::args::{
    DEFAULT_AUDIO_DIR, DEFAULT_IMAGES_DIR, DEFAULT_ITERATIONS, DEFAULT_PASSWORD, DEFAULT_TIMEOUT,
    DEFAULT_WORKFLOWS, HarnessArgs, Visibility, default_concurrency,
};
use crate::error::{AppError, AppResult, ValidationError};

use super::types::ConfigFile;

/// Fully resolved run settings: CLI flag > config file > built-in default.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub workflows: u64,
    pub concurrency: NonZeroUsize,
    pub iterations: u32,
    pub password: String,
    pub audio_dir: PathBuf,
    pub images_dir: PathBuf,
    pub visibility: Visibility,
    pub timeout: Duration,
}

/// Merges CLI arguments with an optional config file.
///
/// # Errors
///
/// Returns a validation error when no base URL is given anywhere, when the
/// base URL does not parse, or when a config-file duration is malformed.
pub fn resolve(args: &HarnessArgs, config: Option<&ConfigFile>) -> AppResult<Settings> {
    let target = config.and_then(|file| file.target.as_ref());
    let load = config.and_then(|file| file.load.as_ref());
    let resources = config.and_then(|file| file.resources.as_ref());

    let raw_base = args
        .base_url
        .clone()
        .or_else(|| target.and_then(|section| section.base_url.clone()))
        .ok_or_else(|| AppError::validation(ValidationError::MissingBaseUrl))?;
    let base_url = Url::parse(&raw_base).map_err(|source| {
        AppError::validation(ValidationError::InvalidBaseUrl {
            value: raw_base,
            source,
        })
    })?;

    let timeout = match args.timeout {
        Some(value) => value,
        None => match target.and_then(|section| section.timeout.as_deref()) {
            Some(raw) => parse_duration_arg(raw)?,
            None => DEFAULT_TIMEOUT,
        },
    };

    Ok(Settings {
        base_url,
        workflows: args
            .workflows
            .or_else(|| load.and_then(|section| section.workflows))
            .unwrap_or(DEFAULT_WORKFLOWS),
        concurrency: args
            .concurrency
            .or_else(|| load.and_then(|section| section.concurrency))
            .unwrap_or_else(default_concurrency),
        iterations: args
            .iterations
            .or_else(|| load.and_then(|section| section.iterations))
            .unwrap_or(DEFAULT_ITERATIONS),
        password: args
            .password
            .clone()
            .or_else(|| load.and_then(|section| section.password.clone()))
            .unwrap_or_else(|| DEFAULT_PASSWORD.to_owned()),
        audio_dir: args
            .audio_dir
            .clone()
            .or_else(|| resources.and_then(|section| section.audio_dir.clone()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_AUDIO_DIR)),
        images_dir: args
            .images_dir
            .clone()
            .or_else(|| resources.and_then(|section| section.images_dir.clone()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGES_DIR)),
        visibility: args
            .visibility
            .or_else(|| load.and_then(|section| section.visibility))
            .unwrap_or(Visibility::Public),
        timeout,
    })
}
