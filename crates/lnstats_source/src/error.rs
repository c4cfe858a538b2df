//! Error types for the source adapter.

use thiserror::Error;

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors that can occur while fetching statistics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Network failure or unexpected HTTP status.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether a later attempt may succeed.
        retryable: bool,
    },

    /// The response body is not an array of stat records.
    #[error("invalid response shape: {0}")]
    InvalidShape(String),

    /// The response is a well-formed but empty array.
    #[error("the source returned an empty list of stat records")]
    EmptyResult,
}

impl SourceError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SourceError::Transport { retryable: true, .. })
    }
}
