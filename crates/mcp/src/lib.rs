//! MCP (Model Context Protocol) server library.
//!
//! This crate provides the JSON-RPC message types and a stdio server loop
//! for exposing tools to an MCP client.
//!
//! # Example
//!
//! ```no_run
//! use mcp::{CallToolResult, Implementation, Server, Tool, ToolService};
//! use serde_json::Value;
//!
//! struct Hello;
//!
//! impl ToolService for Hello {
//!     fn tools(&self) -> Vec<Tool> {
//!         vec![Tool {
//!             name: "hello".to_string(),
//!             description: Some("Say hello".to_string()),
//!             input_schema: serde_json::json!({"type": "object", "properties": {}}),
//!         }]
//!     }
//!
//!     async fn call_tool(&self, _name: &str, _args: Option<Value>) -> mcp::Result<CallToolResult> {
//!         Ok(CallToolResult::text("hello"))
//!     }
//! }
//!
//! # async fn example() -> mcp::Result<()> {
//! let info = Implementation {
//!     name: "hello-server".to_string(),
//!     version: "0.1.0".to_string(),
//! };
//! Server::new(info, Hello).serve_stdio().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod protocol;
mod server;

pub use error::{Error, Result};
pub use protocol::{
    CallToolParams, CallToolResult, FALLBACK_PROTOCOL_VERSION, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, Implementation, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, METHOD_NOT_FOUND, PARSE_ERROR, RequestId,
    SUPPORTED_PROTOCOL_VERSIONS, ServerCapabilities, Tool, ToolContent, ToolsCapability,
    negotiate_version,
};
pub use server::{MAX_MESSAGE_SIZE, Server, ToolService};
