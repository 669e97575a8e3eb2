use std::time::Duration;

use thiserror::Error;

/// Errors from the inference backend.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend answered with a non-success HTTP status.
    #[error("LM Studio API error: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("LM Studio request timed out after {}ms", after.as_millis())]
    Timeout { after: Duration },

    /// Connection refused, DNS failure, reset, and the like.
    #[error("failed to communicate with LM Studio: {0}")]
    Transport(String),

    #[error("invalid LM Studio response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout { after: timeout }
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
