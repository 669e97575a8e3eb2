//! MCP error types.

use crate::protocol::JsonRpcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("transport I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("tool call failed: {0}")]
    ToolCallFailed(String),
}

impl Error {
    /// Convert into the JSON-RPC error sent back to the client.
    pub fn to_rpc_error(&self) -> JsonRpcError {
        match self {
            Error::ToolNotFound(_) | Error::InvalidParams(_) => {
                JsonRpcError::invalid_params(self.to_string())
            }
            Error::Io(_) | Error::Serialize(_) | Error::ToolCallFailed(_) => {
                JsonRpcError::internal(self.to_string())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
