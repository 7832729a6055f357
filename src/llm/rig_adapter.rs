//! Bridges a rig `CompletionModel` to our `LlmProvider` trait.

use async_trait::async_trait;
use rig::completion::{AssistantContent, CompletionError, CompletionModel, Message};
use serde_json::Value;
use tracing::debug;

use crate::error::LlmError;
use crate::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, GenerationParams, LlmProvider,
};

const QUOTA_MARKERS: &[&str] = &["429", "resource_exhausted", "resource has been exhausted", "quota"];
const NOT_FOUND_MARKERS: &[&str] = &["not_found", "is not found"];

/// Turns our generation parameters into provider-specific request fields.
pub type ParamsMapper = fn(&GenerationParams) -> Value;

/// Adapter from a rig completion model to `LlmProvider`.
pub struct RigAdapter<M> {
    model: M,
    model_name: String,
    provider: &'static str,
    params_mapper: ParamsMapper,
}

impl<M: CompletionModel> RigAdapter<M> {
    /// `params_mapper` shapes generation parameters into rig's
    /// `additional_params` for this provider.
    pub fn new(
        model: M,
        model_name: &str,
        provider: &'static str,
        params_mapper: ParamsMapper,
    ) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
            provider,
            params_mapper,
        }
    }
}

#[async_trait]
impl<M> LlmProvider for RigAdapter<M>
where
    M: CompletionModel + Send + Sync + 'static,
{
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let params = request.params;
        let response = self
            .model
            .completion_request(Message::user(request.prompt))
            .additional_params((self.params_mapper)(&params))
            .send()
            .await
            .map_err(|e| map_completion_error(self.provider, &self.model_name, e))?;

        let content: String = response
            .choice
            .iter()
            .filter_map(|c| match c {
                AssistantContent::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect();

        if content.is_empty() {
            return Err(LlmError::InvalidResponse {
                provider: self.provider.to_string(),
                reason: "response contained no text".to_string(),
            });
        }

        let input_tokens = u32::try_from(response.usage.input_tokens).unwrap_or(u32::MAX);
        let output_tokens = u32::try_from(response.usage.output_tokens).unwrap_or(u32::MAX);
        debug!(
            model = %self.model_name,
            input_tokens,
            output_tokens,
            "Completion received"
        );

        Ok(CompletionResponse {
            content,
            input_tokens,
            output_tokens,
            finish_reason: FinishReason::from_usage(output_tokens, params.max_output_tokens),
        })
    }
}

/// Map a rig error onto `LlmError`.
///
/// rig reports non-2xx replies as `ProviderError` carrying the API's error
/// body or message, so quota and missing-model cases are recognised from
/// that text.
pub fn map_completion_error(provider: &str, model: &str, error: CompletionError) -> LlmError {
    let reason = error.to_string();
    let lower = reason.to_lowercase();

    if QUOTA_MARKERS.iter().any(|m| lower.contains(m)) {
        return LlmError::RateLimited {
            provider: provider.to_string(),
            reason,
        };
    }
    if NOT_FOUND_MARKERS.iter().any(|m| lower.contains(m)) {
        return LlmError::ModelNotAvailable {
            provider: provider.to_string(),
            model: model.to_string(),
        };
    }

    match error {
        CompletionError::JsonError(_) | CompletionError::ResponseError(_) => {
            LlmError::InvalidResponse {
                provider: provider.to_string(),
                reason,
            }
        }
        _ => LlmError::RequestFailed {
            provider: provider.to_string(),
            reason,
        },
    }
}
