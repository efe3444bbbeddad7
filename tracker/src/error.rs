use thiserror::Error;

/// Result type alias for tracker client operations
pub type Result<T, E = TrackerError> = std::result::Result<T, E>;

/// Errors that can occur while talking to the remote tracking API
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}
