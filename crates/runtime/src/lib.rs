//! LM Sidekick runtime: tool handlers backed by a local LM Studio model.
//!
//! This crate holds everything between the MCP transport and the inference
//! backend: the tool catalog, argument shaping, prompt templates, the batch
//! runner and the HTTP client for LM Studio's OpenAI-compatible API.
//!
//! # Overview
//!
//! - **Completion**: a trait abstracting the inference backend;
//!   `InferenceClient` is the LM Studio implementation.
//! - **Sidekick**: the tool dispatcher. Implements `mcp::ToolService` so it
//!   can be handed straight to `mcp::Server`.
//! - **BatchRunner**: sequential, paced chunk processing for `batch_process`.
//!
//! # Example
//!
//! ```no_run
//! use runtime::{InferenceClient, InferenceConfig, Sidekick};
//!
//! # async fn example() -> runtime::Result<()> {
//! let client = InferenceClient::new(InferenceConfig::default());
//! let sidekick = Sidekick::new(client);
//! let result = sidekick
//!     .dispatch("automate_menial_task", Some(serde_json::json!({
//!         "task_type": "summarize",
//!         "input_data": "Rust is a systems programming language...",
//!     })))
//!     .await?;
//! println!("{}", result.joined_text());
//! # Ok(())
//! # }
//! ```

pub mod batch;
mod error;
pub mod llm;
pub mod prompts;
pub mod tools;

#[cfg(test)]
mod testing;

pub use batch::{BatchReport, BatchRunner, BatchSize, ChunkOutcome};
pub use error::{Error, Result};
pub use llm::{BackendError, Completion, CompletionRequest, InferenceClient, InferenceConfig};
pub use prompts::{Complexity, TaskKind};
pub use tools::{ConnectionState, HealthStatus, Sidekick, ToolName};
