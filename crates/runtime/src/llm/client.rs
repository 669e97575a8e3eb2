//! LM Studio client (OpenAI-compatible chat completions API).

use std::time::Duration;

use tracing::{debug, error};

use super::types::{ApiMessage, ApiRequest, ApiResponse, CompletionRequest, InferenceConfig};
use super::{BackendError, Completion};

/// Returned when the backend answers without any message content.
pub const NO_RESPONSE: &str = "No response generated";

/// Total timeout for the health probe, independent of the completion timeout.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a local LM Studio server.
///
/// Configuration is fixed at construction; the client is safe to share
/// between concurrent callers.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    config: InferenceConfig,
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn send(&self, request: &CompletionRequest) -> Result<String, BackendError> {
        let timeout = self.config.timeout();
        let body = ApiRequest {
            model: &self.config.model,
            messages: vec![ApiMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        };

        let response = self
            .http
            .post(self.config.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| BackendError::from_reqwest(e, timeout))?;

        Ok(api_response
            .into_first_content()
            .unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}

impl Completion for InferenceClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        debug!(
            model = %self.config.model,
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            prompt_chars = request.prompt.len(),
            "sending completion request"
        );

        let result = self.send(&request).await;
        if let Err(e) = &result {
            error!(error = %e, "LM Studio API call failed");
        }
        result
    }

    async fn health_check(&self) -> bool {
        let response = self
            .http
            .get(self.config.endpoint("models"))
            .bearer_auth(&self.config.api_key)
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(r) if r.status().is_success() => true,
            Ok(r) => {
                debug!(status = %r.status(), "health probe rejected");
                false
            }
            Err(e) => {
                debug!(error = %e, "health probe failed");
                false
            }
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn api_url(&self) -> &str {
        &self.config.api_url
    }
}
