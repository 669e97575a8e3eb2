use thiserror::Error;

use crate::llm::BackendError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<Error> for mcp::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::UnknownTool(name) => mcp::Error::ToolNotFound(name),
            Error::InvalidArguments { .. } => mcp::Error::InvalidParams(err.to_string()),
            other => mcp::Error::ToolCallFailed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
