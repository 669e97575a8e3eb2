//! Tool registry and dispatch.

pub mod args;
mod dispatch;
mod health;
mod registry;

pub use dispatch::Sidekick;
pub use health::{ConnectionState, HealthStatus};
pub use registry::{ToolName, descriptors};
