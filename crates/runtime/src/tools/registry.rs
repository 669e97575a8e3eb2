//! Static catalog of the tools this server exposes.

use std::fmt;
use std::str::FromStr;

use mcp::Tool;
use serde_json::{Value, json};

use crate::batch::{DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE, MIN_BATCH_SIZE};
use crate::prompts::{Complexity, TaskKind};
use crate::{Error, Result};

/// Every tool the dispatcher knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    OffloadContext,
    AutomateMenialTask,
    BatchProcess,
    HealthCheck,
}

impl ToolName {
    pub const ALL: [ToolName; 4] = [
        ToolName::OffloadContext,
        ToolName::AutomateMenialTask,
        ToolName::BatchProcess,
        ToolName::HealthCheck,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::OffloadContext => "offload_context",
            ToolName::AutomateMenialTask => "automate_menial_task",
            ToolName::BatchProcess => "batch_process",
            ToolName::HealthCheck => "health_check",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolName::OffloadContext => "Offload complex context to local LM Studio for processing",
            ToolName::AutomateMenialTask => "Automate simple, repetitive tasks using local AI",
            ToolName::BatchProcess => "Process multiple similar items in batch",
            ToolName::HealthCheck => "Check the health and status of the LM Studio connection",
        }
    }

    pub fn input_schema(self) -> Value {
        match self {
            ToolName::OffloadContext => json!({
                "type": "object",
                "properties": {
                    "context": {
                        "type": "string",
                        "description": "The context or information to process"
                    },
                    "task": {
                        "type": "string",
                        "description": "The specific task to perform with the context"
                    },
                    "complexity": {
                        "type": "string",
                        "enum": Complexity::ALL.map(Complexity::as_str),
                        "description": "Task complexity level",
                        "default": Complexity::default().as_str()
                    }
                },
                "required": ["context", "task"]
            }),
            ToolName::AutomateMenialTask => json!({
                "type": "object",
                "properties": {
                    "task_type": {
                        "type": "string",
                        "enum": TaskKind::ALL.map(TaskKind::as_str),
                        "description": "Type of menial task to perform"
                    },
                    "input_data": {
                        "type": "string",
                        "description": "Data to process"
                    },
                    "output_format": {
                        "type": "string",
                        "description": "Desired output format",
                        "default": super::args::DEFAULT_OUTPUT_FORMAT
                    }
                },
                "required": ["task_type", "input_data"]
            }),
            ToolName::BatchProcess => json!({
                "type": "object",
                "properties": {
                    "items": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Array of items to process"
                    },
                    "operation": {
                        "type": "string",
                        "description": "Operation to perform on each item"
                    },
                    "batch_size": {
                        "type": "integer",
                        "minimum": MIN_BATCH_SIZE,
                        "maximum": MAX_BATCH_SIZE,
                        "default": DEFAULT_BATCH_SIZE,
                        "description": "Number of items to process at once"
                    }
                },
                "required": ["items", "operation"]
            }),
            ToolName::HealthCheck => json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }

    pub fn descriptor(self) -> Tool {
        Tool {
            name: self.as_str().to_string(),
            description: Some(self.description().to_string()),
            input_schema: self.input_schema(),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| Error::UnknownTool(s.to_string()))
    }
}

/// Descriptors for `tools/list`, in a fixed order.
pub fn descriptors() -> Vec<Tool> {
    ToolName::ALL.into_iter().map(ToolName::descriptor).collect()
}
