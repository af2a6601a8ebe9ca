use std::sync::Arc;

use async_trait::async_trait;
use tracing::Instrument;

use super::parser::parse_generated_fields;
use super::prompt::build_generation_prompt;
use super::provider::{CompletionProvider, CompletionRequest};
use crate::binding::BoundField;
use crate::config::ProviderConfig;
use crate::error::AppError;
use crate::models::FieldDescriptor;
use crate::validation::has_interface_definition;

/// Anything that turns an interface definition into field descriptors.
///
/// Implemented in process by [`FieldGenerator`] and over HTTP by
/// [`crate::client::GenFormClient`].
#[async_trait]
pub trait FieldSource: Send + Sync {
    async fn fetch_fields(
        &self,
        definition: Option<&serde_json::Value>,
    ) -> Result<Vec<FieldDescriptor>, AppError>;
}

/// Prompt → completion → parsed fields, in a single best-effort round trip.
pub struct FieldGenerator {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    max_tokens: u32,
}

impl FieldGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
        }
    }

    pub fn from_config(provider: Arc<dyn CompletionProvider>, config: &ProviderConfig) -> Self {
        Self::new(provider, config.model.clone(), config.max_tokens)
    }

    /// Generate fields for `definition`, each bound to no-op handlers.
    ///
    /// Missing definitions fail with `InvalidInput`. Provider and parse
    /// errors are logged and collapsed into `GenerationFailure`.
    pub async fn generate(
        &self,
        definition: Option<&serde_json::Value>,
    ) -> Result<Vec<BoundField>, AppError> {
        let definition = match definition {
            Some(d) if has_interface_definition(Some(d)) => d,
            _ => return Err(AppError::invalid_input()),
        };

        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!(
            "generate_fields",
            %request_id,
            provider = self.provider.provider_name(),
            model = %self.model,
        );

        async move {
            let request = CompletionRequest {
                model: self.model.clone(),
                prompt: build_generation_prompt(definition),
                max_tokens: self.max_tokens,
            };

            let fields = self
                .provider
                .complete(request)
                .await
                .and_then(|text| parse_generated_fields(&text));

            match fields {
                Ok(fields) => {
                    tracing::info!(count = fields.len(), "Generated form fields");
                    Ok(fields.into_iter().map(BoundField::noop).collect())
                }
                Err(e) => {
                    tracing::error!("Error generating fields: {}", e);
                    Err(AppError::generation_failure())
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl FieldSource for FieldGenerator {
    async fn fetch_fields(
        &self,
        definition: Option<&serde_json::Value>,
    ) -> Result<Vec<FieldDescriptor>, AppError> {
        let bound = self.generate(definition).await?;
        Ok(bound.into_iter().map(BoundField::into_descriptor).collect())
    }
}
