//! Relay error types.

use thiserror::Error;

/// Convenience alias for upstream and relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

/// Errors raised while talking to the upstream generation API.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Upstream answered with a non-2xx status or a body that could not be parsed.
    #[error("Upstream request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Network failure talking to the upstream.
    #[error("Upstream transport error: {0}")]
    Transport(String),

    /// A single streamed record could not be parsed.
    #[error("Malformed upstream record: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        RelayError::Transport(e.to_string())
    }
}
