//! Prompt templates for each tool.
//!
//! Everything here is a pure string mapping; sampling parameters that go
//! with a prompt live next to the template that needs them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Kind of menial task handled by `automate_menial_task`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Summarize,
    Extract,
    Format,
    Validate,
    Classify,
}

impl TaskKind {
    pub const ALL: [TaskKind; 5] = [
        TaskKind::Summarize,
        TaskKind::Extract,
        TaskKind::Format,
        TaskKind::Validate,
        TaskKind::Classify,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Summarize => "summarize",
            TaskKind::Extract => "extract",
            TaskKind::Format => "format",
            TaskKind::Validate => "validate",
            TaskKind::Classify => "classify",
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            TaskKind::Summarize => "Summarize the following content concisely:",
            TaskKind::Extract => "Extract key information from:",
            TaskKind::Format => "Format the following data properly:",
            TaskKind::Validate => "Validate and check the following for correctness:",
            TaskKind::Classify => "Classify or categorize the following:",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TaskKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::Configuration(format!("unrecognized task kind: {s}")))
    }
}

/// Complexity hint for `offload_context`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Low,
    Medium,
    High,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Complexity::Low, Complexity::Medium, Complexity::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }

    /// Sampling temperature for this complexity.
    pub fn temperature(self) -> f32 {
        match self {
            Complexity::High => 0.7,
            Complexity::Low | Complexity::Medium => 0.3,
        }
    }

    /// Token budget for this complexity.
    pub fn max_tokens(self) -> u32 {
        match self {
            Complexity::High => 4096,
            Complexity::Low | Complexity::Medium => 2048,
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Temperature for menial tasks.
pub const MENIAL_TASK_TEMPERATURE: f32 = 0.1;

/// Temperature for each batch chunk.
pub const BATCH_TEMPERATURE: f32 = 0.2;

pub fn offload_context(task: &str, complexity: Complexity, context: &str) -> String {
    format!(
        "Task: {task}\n\
         Complexity: {complexity}\n\
         Context: {context}\n\
         \n\
         Please process this context and complete the requested task. Be concise and focused."
    )
}

pub fn menial_task(kind: TaskKind, input: &str, output_format: &str) -> String {
    let instruction = kind.instruction();
    format!("{instruction}\n\n{input}\n\nOutput format: {output_format}")
}

/// Prompt for one chunk of a batch.
///
/// `first_index` is the 1-based position of `items[0]` in the whole batch,
/// so numbering continues across chunks.
pub fn batch_chunk(operation: &str, items: &[String], first_index: usize) -> String {
    let listing = items
        .iter()
        .enumerate()
        .map(|(offset, item)| format!("{}. {item}", first_index + offset))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Operation: {operation}\n\
         Items to process:\n\
         {listing}\n\
         \n\
         Process each item according to the operation and provide results."
    )
}
