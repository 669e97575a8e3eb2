//! Tool dispatcher: routes a call to its handler and wraps the result.

use chrono::Utc;
use mcp::{CallToolResult, Tool, ToolService};
use serde_json::Value;
use tracing::{error, info};

use super::args::{self, BatchProcessArgs, HealthCheckArgs, MenialTaskArgs, OffloadContextArgs};
use super::health::HealthStatus;
use super::registry::{self, ToolName};
use crate::batch::BatchRunner;
use crate::llm::{Completion, CompletionRequest};
use crate::prompts::{self, MENIAL_TASK_TEMPERATURE};
use crate::Result;

/// The tool handlers, bound to an inference backend.
pub struct Sidekick<C> {
    backend: C,
    batch: BatchRunner,
}

impl<C: Completion> Sidekick<C> {
    pub fn new(backend: C) -> Self {
        Self::with_batch_runner(backend, BatchRunner::default())
    }

    pub fn with_batch_runner(backend: C, batch: BatchRunner) -> Self {
        Self { backend, batch }
    }

    pub fn backend(&self) -> &C {
        &self.backend
    }

    /// Run the tool called `name`.
    ///
    /// Missing `arguments` are treated as an empty object. Backend failures
    /// from `offload_context` and `automate_menial_task` are returned as-is;
    /// `batch_process` and `health_check` report them inside their result.
    pub async fn dispatch(&self, name: &str, arguments: Option<Value>) -> Result<CallToolResult> {
        let tool = name.parse::<ToolName>().inspect_err(|_| {
            error!(tool = name, "Unknown tool");
        })?;
        info!(tool = %tool, "tool execution requested");

        let arguments = arguments.unwrap_or_else(|| Value::Object(Default::default()));
        let result = self.run(tool, arguments).await;
        if let Err(e) = &result {
            error!(tool = %tool, error = %e, "tool execution failed");
        }
        result
    }

    async fn run(&self, tool: ToolName, arguments: Value) -> Result<CallToolResult> {
        match tool {
            ToolName::OffloadContext => self.offload_context(args::parse(tool, arguments)?).await,
            ToolName::AutomateMenialTask => {
                self.automate_menial_task(args::parse(tool, arguments)?).await
            }
            ToolName::BatchProcess => self.batch_process(args::parse(tool, arguments)?).await,
            ToolName::HealthCheck => {
                let HealthCheckArgs {} = args::parse(tool, arguments)?;
                self.health_check().await
            }
        }
    }

    pub async fn offload_context(&self, args: OffloadContextArgs) -> Result<CallToolResult> {
        info!(task = %args.task, complexity = %args.complexity, "context offload requested");

        let prompt = prompts::offload_context(&args.task, args.complexity, &args.context);
        let request = CompletionRequest::new(prompt)
            .temperature(args.complexity.temperature())
            .max_tokens(args.complexity.max_tokens());
        let text = self.backend.complete(request).await?;

        info!("context offload completed");
        Ok(CallToolResult::text(text))
    }

    pub async fn automate_menial_task(&self, args: MenialTaskArgs) -> Result<CallToolResult> {
        info!(task_type = %args.task_type, "menial task requested");

        let prompt = prompts::menial_task(args.task_type, &args.input_data, &args.output_format);
        let request = CompletionRequest::new(prompt).temperature(MENIAL_TASK_TEMPERATURE);
        let text = self.backend.complete(request).await?;

        info!(task_type = %args.task_type, "menial task completed");
        Ok(CallToolResult::text(text))
    }

    pub async fn batch_process(&self, args: BatchProcessArgs) -> Result<CallToolResult> {
        let batch_size = args.batch_size()?;
        let report = self
            .batch
            .run(&self.backend, &args.items, &args.operation, batch_size)
            .await;
        Ok(CallToolResult::text(report.to_string()))
    }

    pub async fn health_check(&self) -> Result<CallToolResult> {
        let status = self.health_status().await;
        Ok(CallToolResult::text(serde_json::to_string_pretty(&status)?))
    }

    /// Probe the backend. An unreachable backend is a normal `Unhealthy` result.
    pub async fn health_status(&self) -> HealthStatus {
        let reachable = self.backend.health_check().await;
        let status = HealthStatus {
            lm_studio_connection: reachable.into(),
            timestamp: Utc::now(),
            model: self.backend.model().to_string(),
            api_url: self.backend.api_url().to_string(),
        };
        info!(healthy = reachable, "health check completed");
        status
    }
}

impl<C: Completion> ToolService for Sidekick<C> {
    fn tools(&self) -> Vec<Tool> {
        registry::descriptors()
    }

    async fn call_tool(&self, name: &str, arguments: Option<Value>) -> mcp::Result<CallToolResult> {
        self.dispatch(name, arguments).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::llm::BackendError;
    use crate::testing::StubBackend;
    use serde_json::json;
    use std::time::Duration;

    fn sidekick(backend: StubBackend) -> Sidekick<StubBackend> {
        Sidekick::with_batch_runner(backend, BatchRunner::new(Duration::ZERO))
    }

    #[tokio::test]
    async fn offload_context_high_complexity_sampling() {
        let sk = sidekick(StubBackend::default());
        let result = sk
            .dispatch(
                "offload_context",
                Some(json!({"context": "ctx", "task": "summarize", "complexity": "high"})),
            )
            .await
            .unwrap();
        assert_eq!(result.joined_text(), "result 1");

        let request = &sk.backend().requests()[0];
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 4096);
        assert!(request.prompt.starts_with("Task: summarize\nComplexity: high\nContext: ctx\n"));
    }

    #[tokio::test]
    async fn offload_context_default_and_medium_sampling() {
        let sk = sidekick(StubBackend::default());
        sk.dispatch("offload_context", Some(json!({"context": "c", "task": "t"})))
            .await
            .unwrap();
        sk.dispatch(
            "offload_context",
            Some(json!({"context": "c", "task": "t", "complexity": "medium"})),
        )
        .await
        .unwrap();

        for request in sk.backend().requests() {
            assert_eq!((request.temperature, request.max_tokens), (0.3, 2048));
        }
        assert!(sk.backend().requests()[0].prompt.contains("Complexity: low"));
    }

    #[tokio::test]
    async fn menial_task_builds_template_prompt() {
        let sk = sidekick(StubBackend::default());
        sk.dispatch(
            "automate_menial_task",
            Some(json!({"task_type": "summarize", "input_data": "The quick brown fox..."})),
        )
        .await
        .unwrap();

        let request = &sk.backend().requests()[0];
        assert_eq!(
            request.prompt,
            "Summarize the following content concisely:\n\nThe quick brown fox...\n\nOutput format: text"
        );
        assert_eq!(request.temperature, 0.1);
    }

    #[tokio::test]
    async fn backend_failure_propagates_from_single_shot_tools() {
        let sk = sidekick(StubBackend::down());
        let err = sk
            .dispatch("offload_context", Some(json!({"context": "c", "task": "t"})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Backend(BackendError::Status { status: 500, .. })));

        let err = sk
            .dispatch(
                "automate_menial_task",
                Some(json!({"task_type": "extract", "input_data": "x"})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Backend(_)));

        let mcp_err: mcp::Error = err.into();
        assert!(mcp_err.to_string().contains("500 Internal Server Error"));
    }

    #[tokio::test]
    async fn unknown_tool_never_reaches_a_handler() {
        let sk = sidekick(StubBackend::default());
        let err = sk.dispatch("format_disk", Some(json!({}))).await.unwrap_err();
        assert!(matches!(err, Error::UnknownTool(ref name) if name == "format_disk"));
        assert!(sk.backend().requests().is_empty());

        let mcp_err = sk.call_tool("format_disk", None).await.unwrap_err();
        assert!(matches!(mcp_err, mcp::Error::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn invalid_arguments_never_reach_the_backend() {
        let sk = sidekick(StubBackend::default());
        let err = sk.dispatch("automate_menial_task", None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArguments { .. }));

        let err = sk
            .dispatch(
                "batch_process",
                Some(json!({"items": ["a"], "operation": "op", "batch_size": 0})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArguments { .. }));
        assert!(sk.backend().requests().is_empty());
    }

    #[tokio::test]
    async fn batch_process_example() {
        let sk = sidekick(StubBackend::default());
        let result = sk
            .dispatch(
                "batch_process",
                Some(json!({"items": ["a", "b", "c"], "operation": "uppercase", "batch_size": 2})),
            )
            .await
            .unwrap();

        let requests = sk.backend().requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].prompt.contains("1. a\n2. b\n"));
        assert!(requests[1].prompt.contains("3. c\n"));
        assert_eq!(result.joined_text(), "Batch 1: result 1\n\nBatch 2: result 2");
    }

    #[tokio::test]
    async fn batch_process_succeeds_when_backend_is_down() {
        let sk = sidekick(StubBackend::down());
        let result = sk
            .dispatch("batch_process", Some(json!({"items": ["a", "b"], "operation": "op"})))
            .await
            .unwrap();
        assert!(result.joined_text().starts_with("Batch 1: Error - "));
    }

    #[tokio::test]
    async fn health_check_reports_unhealthy_without_failing() {
        let sk = sidekick(StubBackend::down());
        let result = sk.dispatch("health_check", None).await.unwrap();

        let status: Value = serde_json::from_str(&result.joined_text()).unwrap();
        assert_eq!(status["lm_studio_connection"], "unhealthy");
        assert_eq!(status["model"], "stub-model");
        assert_eq!(status["api_url"], "http://stub.invalid/v1");
        assert!(status["timestamp"].is_string());
    }

    #[tokio::test]
    async fn health_check_rejects_unexpected_arguments() {
        let sk = sidekick(StubBackend::default());
        assert!(sk.dispatch("health_check", Some(json!({}))).await.is_ok());

        let err = sk
            .dispatch("health_check", Some(json!({"deep": true})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArguments { .. }));
        let mcp_err: mcp::Error = err.into();
        assert_eq!(mcp_err.to_rpc_error().code, mcp::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let sk = sidekick(StubBackend::default());
        assert!(sk.health_status().await.is_healthy());
    }

    #[test]
    fn service_lists_registry() {
        let sk = sidekick(StubBackend::default());
        assert_eq!(sk.tools().len(), 4);
    }
}
