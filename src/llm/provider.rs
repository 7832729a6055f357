//! Provider abstraction for generative-language backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Sampling and length parameters for a single generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_output_tokens: u32,
}

impl GenerationParams {
    /// Low-temperature, schema-following parameters for classification.
    ///
    /// The output budget is generous because thinking models spend part of
    /// it before emitting text.
    pub fn classification() -> Self {
        Self {
            temperature: Some(0.2),
            top_p: Some(0.8),
            max_output_tokens: 8192,
        }
    }

    /// Minimal budget for reachability/quota probes.
    pub fn probe() -> Self {
        Self {
            temperature: None,
            top_p: None,
            max_output_tokens: 8,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::classification()
    }
}

/// A single-turn completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub params: GenerationParams,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            params: GenerationParams::default(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

}

/// Why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    /// The output budget was used up; the text is likely truncated.
    Length,
}

impl FinishReason {
    /// Infer the finish reason from token usage against the budget.
    pub fn from_usage(output_tokens: u32, max_output_tokens: u32) -> Self {
        if max_output_tokens > 0 && output_tokens >= max_output_tokens {
            Self::Length
        } else {
            Self::Stop
        }
    }
}

/// Raw text returned by a backend.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: FinishReason,
}

/// A generative-language backend bound to one model.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model identifier this provider talks to.
    fn model_name(&self) -> &str;

    /// Run one completion. The returned text is untrusted.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
