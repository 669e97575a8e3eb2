//! Inference backend: the `Completion` trait and its LM Studio client.

mod client;
pub mod errors;
pub mod types;

pub use client::{HEALTH_CHECK_TIMEOUT, InferenceClient, NO_RESPONSE};
pub use errors::BackendError;
pub use types::{CompletionRequest, InferenceConfig};

use std::future::Future;

/// Trait for inference backends.
///
/// The tool dispatcher and batch runner are generic over this so they can
/// be driven by a stub in tests.
pub trait Completion: Send + Sync {
    /// Run a single-turn completion and return the generated text.
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;

    /// Whether the backend is reachable. Never fails.
    fn health_check(&self) -> impl Future<Output = bool> + Send;

    /// Configured model identifier.
    fn model(&self) -> &str;

    /// Configured API base URL.
    fn api_url(&self) -> &str;
}
