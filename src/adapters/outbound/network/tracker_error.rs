use std::time::Duration;
use thiserror::Error;

/// Maximum number of characters of an error body kept for diagnostics
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 200;

/// Failures of a single issue-tracker call
///
/// The retry wrapper branches on the variant: only `RateLimited` is retried.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Issue tracker rate limited the request (retry after {retry_after:?}): {body}")]
    RateLimited {
        retry_after: Option<Duration>,
        body: String,
    },

    #[error("Issue tracker returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request to issue tracker failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode issue tracker response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Version {name:?} not found in project {project}")]
    VersionNotFound { name: String, project: String },

    #[error("Request to issue tracker was cancelled")]
    Cancelled,

    #[error("Giving up after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<TrackerError>,
    },
}

impl TrackerError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, TrackerError::RateLimited { .. })
    }
}

/// Shortens a response body for inclusion in an error
pub(crate) fn truncate_body(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(MAX_ERROR_BODY_CHARS)
        .collect()
}
