use thiserror::Error;

/// A failure to obtain a usable payload from the sentiment feed.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to build the HTTP client: {0}")]
    ClientBuild(String),

    #[error("The feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The feed did not respond within {0:?}")]
    Timeout(std::time::Duration),

    #[error("The feed returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to deserialize the feed response: {0}")]
    Deserialization(String),

    #[error("The feed response has no '{0}' indicator")]
    MissingIndicator(String),
}
