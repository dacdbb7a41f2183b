use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("A target base URL is required (--base-url, STAMPEDE_BASE_URL, or a config file).")]
    MissingBaseUrl,
    #[error("Invalid base URL '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Duration was empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}' (expected a number with an optional ms/s/m/h suffix).")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration number in '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid duration unit '{unit}' (expected ms, s, m or h).")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be greater than zero.")]
    DurationZero,
    #[error("Duration is too large.")]
    DurationOverflow,
    #[error("Failed to read resource directory '{path}': {source}")]
    ReadMediaDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Resource directory '{path}' contains no files.")]
    EmptyMediaPool { path: PathBuf },
}
