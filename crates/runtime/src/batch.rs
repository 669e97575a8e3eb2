//! Sequential batch processing.
//!
//! Items are split into fixed-size chunks and each chunk becomes one
//! completion request. Chunks run strictly in order with a fixed pause
//! between them, and a failed chunk is recorded in the report instead of
//! aborting the rest.

use std::fmt;
use std::time::Duration;

use tracing::{error, info};

use crate::llm::{BackendError, Completion, CompletionRequest};
use crate::prompts::{self, BATCH_TEMPERATURE};
use crate::{Error, Result};

pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 50;
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Pause between consecutive chunk requests.
pub const PACING_INTERVAL: Duration = Duration::from_secs(1);

/// Number of items per chunk, always within `1..=50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(usize);

impl BatchSize {
    pub fn new(size: usize) -> Result<Self> {
        if (MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&size) {
            Ok(Self(size))
        } else {
            Err(Error::InvalidArguments {
                tool: "batch_process".to_string(),
                reason: format!(
                    "batch_size must be between {MIN_BATCH_SIZE} and {MAX_BATCH_SIZE}, got {size}"
                ),
            })
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(DEFAULT_BATCH_SIZE)
    }
}

/// Outcome of one chunk.
#[derive(Debug, Clone)]
pub struct ChunkOutcome {
    /// 1-based chunk number.
    pub index: usize,
    pub result: std::result::Result<String, BackendError>,
}

impl fmt::Display for ChunkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(text) => write!(f, "Batch {}: {text}", self.index),
            Err(e) => write!(f, "Batch {}: Error - {e}", self.index),
        }
    }
}

/// Per-chunk outcomes in chunk order. One entry per chunk, failed or not.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ChunkOutcome>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, outcome) in self.outcomes.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{outcome}")?;
        }
        Ok(())
    }
}

/// Runs batches against a [`Completion`] backend.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    pacing: Duration,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(PACING_INTERVAL)
    }
}

impl BatchRunner {
    pub fn new(pacing: Duration) -> Self {
        Self { pacing }
    }

    /// Process `items` in chunks of `batch_size`.
    ///
    /// Runs to completion once started; there is no early exit.
    pub async fn run<C: Completion>(
        &self,
        backend: &C,
        items: &[String],
        operation: &str,
        batch_size: BatchSize,
    ) -> BatchReport {
        let size = batch_size.get();
        info!(items = items.len(), batch_size = size, operation, "batch processing started");

        let mut outcomes = Vec::with_capacity(items.len().div_ceil(size));
        for (chunk_idx, chunk) in items.chunks(size).enumerate() {
            if chunk_idx > 0 {
                tokio::time::sleep(self.pacing).await;
            }

            let index = chunk_idx + 1;
            let prompt = prompts::batch_chunk(operation, chunk, chunk_idx * size + 1);
            let request = CompletionRequest::new(prompt).temperature(BATCH_TEMPERATURE);

            let result = backend.complete(request).await;
            if let Err(e) = &result {
                error!(batch = index, operation, error = %e, "batch chunk failed");
            }
            outcomes.push(ChunkOutcome { index, result });
        }

        let report = BatchReport { outcomes };
        info!(
            chunks = report.len(),
            failures = report.failures(),
            "batch processing completed"
        );
        report
    }
}
