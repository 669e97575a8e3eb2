//! Typed argument bundles.
//!
//! Deserializing into these is where the input schema is enforced: missing
//! required fields, wrong types and out-of-set enum values are rejected
//! before any handler runs. Optional fields take their declared defaults.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ToolName;
use crate::batch::{BatchSize, DEFAULT_BATCH_SIZE};
use crate::prompts::{Complexity, TaskKind};
use crate::{Error, Result};

pub const DEFAULT_OUTPUT_FORMAT: &str = "text";

#[derive(Debug, Clone, Deserialize)]
pub struct OffloadContextArgs {
    pub context: String,
    pub task: String,
    #[serde(default)]
    pub complexity: Complexity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenialTaskArgs {
    pub task_type: TaskKind,
    pub input_data: String,
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchProcessArgs {
    pub items: Vec<String>,
    pub operation: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// `health_check` takes no arguments; anything but an empty object is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthCheckArgs {}

impl BatchProcessArgs {
    pub fn batch_size(&self) -> Result<BatchSize> {
        BatchSize::new(self.batch_size)
    }
}

fn default_output_format() -> String {
    DEFAULT_OUTPUT_FORMAT.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

/// Decode the argument bundle for `tool`.
pub(crate) fn parse<T: DeserializeOwned>(tool: ToolName, arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| Error::InvalidArguments {
        tool: tool.as_str().to_string(),
        reason: e.to_string(),
    })
}
