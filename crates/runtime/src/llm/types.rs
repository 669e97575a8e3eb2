//! Inference request/response types.
//!
//! `InferenceConfig` and `CompletionRequest` are the public surface. The
//! `Api*` types mirror the OpenAI-compatible chat completions wire format
//! spoken by LM Studio.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:1234/v1";
pub const DEFAULT_API_KEY: &str = "lm-studio";
pub const DEFAULT_MODEL: &str = "local-model";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Connection parameters for the inference backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL of the OpenAI-compatible API, including the `/v1` suffix.
    pub api_url: String,
    /// Sent as a bearer token.
    pub api_key: String,
    pub model: String,
    /// Completion timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `api_url` joined with `path`, tolerating a trailing slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }
}

/// A single-turn completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

// --- Wire types ---

#[derive(Debug, Serialize)]
pub(crate) struct ApiRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ApiMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    pub choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiChoice {
    #[serde(default)]
    pub message: Option<ApiChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ApiResponse {
    /// Text of the first choice, if it has any.
    pub fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|text| !text.is_empty())
    }
}
