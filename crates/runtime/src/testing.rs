//! Test doubles: a stub inference backend and an in-memory log sink.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use crate::llm::{BackendError, Completion, CompletionRequest};

/// Records every request and answers `result {n}` for the n-th call.
pub(crate) struct StubBackend {
    requests: Mutex<Vec<(Instant, CompletionRequest)>>,
    failing: HashSet<usize>,
    healthy: bool,
}

impl Default for StubBackend {
    fn default() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            healthy: true,
        }
    }
}

impl StubBackend {
    /// Fail the given 1-based calls with an HTTP 500.
    pub fn failing_on(calls: impl IntoIterator<Item = usize>) -> Self {
        Self {
            failing: calls.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Every call fails and the health probe reports down.
    pub fn down() -> Self {
        Self {
            failing: (1..=1000).collect(),
            healthy: false,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.requests.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

impl Completion for StubBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push((Instant::now(), request));
            requests.len()
        };

        if self.failing.contains(&call) {
            Err(BackendError::Status {
                status: 500,
                reason: "Internal Server Error".to_string(),
            })
        } else {
            Ok(format!("result {call}"))
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    fn api_url(&self) -> &str {
        "http://stub.invalid/v1"
    }
}

/// In-memory log sink for asserting on emitted events.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Install a plain-text subscriber writing here for the current thread.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
