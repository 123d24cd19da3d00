//! Upstream error definitions.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the upstream todo API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-success status.
    #[error("External API returned status: {}", .0.as_u16())]
    Status(StatusCode),

    /// Connection, timeout or protocol failure.
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body was not valid JSON.
    #[error("Invalid upstream payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Body was valid JSON of the wrong shape.
    #[error("Unexpected upstream payload: expected {0}")]
    UnexpectedShape(&'static str),

    /// A request URL could not be built.
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The todo id would address a path outside `/todos/`.
    #[error("Todo id resolves outside /todos/: {0:?}")]
    PathEscape(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build upstream client: {0}")]
    Build(#[source] reqwest::Error),
}

impl UpstreamError {
    /// Short classification used as a metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Status(_) => "status",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Decode(_) | UpstreamError::UnexpectedShape(_) => "decode",
            UpstreamError::InvalidUrl(_) | UpstreamError::PathEscape(_) => "request",
            UpstreamError::Build(_) => "build",
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
