use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::engine::FieldSource;
use crate::error::AppError;
use crate::models::FieldDescriptor;

// ============================================================================
// Internal request / response bodies
// ============================================================================

#[derive(Serialize)]
struct GenFormBody<'a> {
    #[serde(rename = "interfaceDefinition", skip_serializing_if = "Option::is_none")]
    interface_definition: Option<&'a serde_json::Value>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

// ============================================================================
// GenFormClient
// ============================================================================

/// HTTP client for a running generation service (`POST /api/genform`).
pub struct GenFormClient {
    http: reqwest::Client,
    base_url: String,
}

impl GenFormClient {
    /// The underlying `reqwest::Client` uses `timeout`; generation can take a while.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `POST /api/genform`. Server errors come back as `InvalidInput` (400)
    /// or `GenerationFailure` (anything else), carrying the server's message.
    pub async fn generate(
        &self,
        definition: Option<&serde_json::Value>,
    ) -> Result<Vec<FieldDescriptor>, AppError> {
        let resp = self
            .http
            .post(format!("{}/api/genform", self.base_url))
            .json(&GenFormBody {
                interface_definition: definition,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("genform request failed: {}", e);
                AppError::generation_failure()
            })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorBody>()
                .await
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("genform returned {status}"));
            return Err(if status == reqwest::StatusCode::BAD_REQUEST {
                AppError::InvalidInput(message)
            } else {
                AppError::GenerationFailure(message)
            });
        }

        resp.json().await.map_err(|e| {
            tracing::error!("genform response was not a field list: {}", e);
            AppError::generation_failure()
        })
    }
}

#[async_trait]
impl FieldSource for GenFormClient {
    async fn fetch_fields(
        &self,
        definition: Option<&serde_json::Value>,
    ) -> Result<Vec<FieldDescriptor>, AppError> {
        self.generate(definition).await
    }
}
