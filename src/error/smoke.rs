use std::path::PathBuf;

use thiserror::Error;

use super::ApiError;

/// A failed step in the `smoke` sweep. The check name matches the log line
/// emitted right before the call, so a failure points at one request.
#[derive(Debug, Error)]
pub enum SmokeError {
    #[error("{check}: {source}")]
    Check {
        check: &'static str,
        #[source]
        source: ApiError,
    },
    #[error("{check}: expected the API to reject this call, but it succeeded")]
    ExpectedRejection { check: &'static str },
    #[error("{check}: failed to read '{path}': {source}")]
    MediaRead {
        check: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{check}: the media pool is empty")]
    EmptyPool { check: &'static str },
}
