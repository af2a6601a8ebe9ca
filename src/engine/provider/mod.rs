pub mod openai;

use async_trait::async_trait;

use crate::error::AppError;

pub use openai::OpenAiProvider;

/// One single-message completion round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    /// Generation budget cap for the response.
    pub max_tokens: u32,
}

// =============================================================================
// CompletionProvider trait
// =============================================================================

/// Abstraction over text-completion APIs.
///
/// Implementations send the prompt as one user message, request a single
/// choice and return that choice's text. Errors are reported as
/// `AppError::Provider`; callers decide how much of them to expose.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name for logs.
    fn provider_name(&self) -> &'static str;

    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError>;
}
