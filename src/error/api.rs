use thiserror::Error;

/// Failures observed while talking to the target API.
///
/// `Transport` covers faults below HTTP (connect errors, timeouts); `Status`
/// is a completed exchange the server rejected. Both stay inside the workflow
/// that hit them and surface as that workflow's outcome.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{endpoint}: could not reach the API: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}: {message}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: String,
    },
    #[error("{endpoint} returned an unreadable body: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} response is missing '{field}'")]
    MissingField {
        endpoint: &'static str,
        field: &'static str,
    },
    #[error("Invalid request URL '{path}': {source}")]
    Url {
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// HTTP status of a rejected exchange, if one completed.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { .. }
            | ApiError::Decode { .. }
            | ApiError::MissingField { .. }
            | ApiError::Url { .. }
            | ApiError::BuildClientFailed { .. } => None,
        }
    }
}
