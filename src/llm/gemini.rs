//! Gemini backend via rig's `gemini` provider.
//!
//! Generation parameters travel as a `generationConfig` object in rig's
//! `additional_params`. Quota exhaustion (HTTP 429 / `RESOURCE_EXHAUSTED`)
//! surfaces as `LlmError::RateLimited`.

use std::sync::Arc;

use rig::client::CompletionClient;
use rig::providers::gemini;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};

use crate::error::LlmError;
use crate::llm::provider::{GenerationParams, LlmProvider};
use crate::llm::rig_adapter::RigAdapter;

pub const PROVIDER: &str = "gemini";

/// Create a Gemini provider for `model` against `base_url`.
pub fn create_gemini_provider(
    api_key: &SecretString,
    base_url: &str,
    model: &str,
) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let client = gemini::Client::builder()
        .api_key(api_key.expose_secret())
        .base_url(base_url.trim_end_matches('/'))
        .build()
        .map_err(|e| LlmError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: format!("Failed to create Gemini client: {e}"),
        })?;

    let completion_model = client.completion_model(model);
    tracing::debug!(model, base_url, "Created Gemini provider");
    Ok(Arc::new(RigAdapter::new(
        completion_model,
        model,
        PROVIDER,
        generation_config,
    )))
}

/// `{"generationConfig": {...}}` with unset sampling fields omitted.
fn generation_config(params: &GenerationParams) -> Value {
    let mut config = Map::new();
    if let Some(temperature) = params.temperature {
        config.insert("temperature".to_string(), json!(temperature));
    }
    if let Some(top_p) = params.top_p {
        config.insert("topP".to_string(), json!(top_p));
    }
    config.insert(
        "maxOutputTokens".to_string(),
        json!(params.max_output_tokens),
    );
    json!({ "generationConfig": config })
}
