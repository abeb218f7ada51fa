//! Error taxonomy shared across the Strato crates

use thiserror::Error;

/// Result type alias for agent and client operations
pub type Result<T> = std::result::Result<T, TaskError>;

/// Errors that can occur while driving a remote task.
///
/// Each variant carries enough structure (kind + message) for the caller to
/// decide between retrying and aborting; the agent itself never retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Caller error in the task specification, surfaced before any network call
    #[error("invalid task spec: {0}")]
    InvalidSpec(String),

    /// Credentials rejected by the remote service (HTTP 401/403)
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Capacity or quota rejection (HTTP 429)
    #[error("quota exceeded: {0}")]
    Quota(String),

    /// Connectivity failure before a response was received
    #[error("transport failure: {0}")]
    Transport(String),

    /// Provider-side failure or contract violation
    #[error("remote service error (status {status}): {message}")]
    Remote {
        /// HTTP status code of the offending response
        status: u16,
        /// Error body or parse diagnostic
        message: String,
    },

    /// The remote service does not know the handle
    #[error("task not found: {0}")]
    NotFound(String),

    /// Task reported complete but its output cannot be located
    #[error("result unavailable: {0}")]
    ResultUnavailable(String),
}

impl TaskError {
    /// Create a remote error from a status code and message
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// True for errors a caller may retry with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Quota(_))
    }

    /// True for "not found" errors
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(TaskError::Transport("reset".to_string()).is_retryable());
        assert!(TaskError::Quota("429".to_string()).is_retryable());
        assert!(!TaskError::Auth("401".to_string()).is_retryable());
        assert!(!TaskError::InvalidSpec("empty image".to_string()).is_retryable());
        assert!(!TaskError::remote(500, "boom").is_retryable());
    }

    #[test]
    fn test_not_found_predicate() {
        assert!(TaskError::NotFound("job-1".to_string()).is_not_found());
        assert!(!TaskError::remote(500, "boom").is_not_found());
    }
}
