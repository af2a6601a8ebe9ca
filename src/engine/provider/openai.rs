use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CompletionProvider, CompletionRequest};
use crate::config::ProviderConfig;
use crate::error::AppError;

// ============================================================================
// Helper
// ============================================================================

fn provider_err(e: impl std::fmt::Display) -> AppError {
    AppError::Provider(e.to_string())
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice. A missing or null content reads as an empty array.
    fn into_text(self) -> Result<String, AppError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Provider("completion returned no choices".into()))?;
        Ok(choice
            .message
            .content
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "[]".to_string()))
    }
}

// ============================================================================
// OpenAiProvider
// ============================================================================

/// HTTP client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(provider_err)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn provider_name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            n: 1,
        };

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(provider_err)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "completion API error ({}): {}",
                status, body
            )));
        }

        let parsed: ChatCompletionResponse = resp.json().await.map_err(provider_err)?;
        parsed.into_text()
    }
}
