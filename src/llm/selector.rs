//! Model selection: probe candidates in priority order, keep the first
//! that answers.
//!
//! Each candidate gets exactly one minimal probe. Failures are classified
//! as quota exhaustion or other errors and the next candidate is tried.
//! No candidate is retried and nothing is cached beyond the returned handle.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::LlmError;
use crate::llm::provider::{CompletionRequest, GenerationParams, LlmProvider};

/// Text sent as the probe prompt.
const PROBE_PROMPT: &str = "ping";

/// Max characters of an error message kept in a probe failure.
const FAILURE_EXCERPT_CHARS: usize = 60;

/// Creates a provider handle bound to one model.
pub trait ProviderFactory {
    fn create(&self, model: &str) -> Result<Arc<dyn LlmProvider>, LlmError>;
}

impl<F> ProviderFactory for F
where
    F: Fn(&str) -> Result<Arc<dyn LlmProvider>, LlmError>,
{
    fn create(&self, model: &str) -> Result<Arc<dyn LlmProvider>, LlmError> {
        self(model)
    }
}

/// Classified reason a candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Rate or quota limit hit.
    Quota,
    /// Any other error, with a short excerpt of its message.
    Other(String),
}

impl ProbeFailure {
    pub fn classify(error: &LlmError) -> Self {
        if error.is_quota() {
            Self::Quota
        } else {
            Self::Other(error.to_string().chars().take(FAILURE_EXCERPT_CHARS).collect())
        }
    }
}

impl std::fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quota => write!(f, "quota"),
            Self::Other(reason) => write!(f, "{reason}"),
        }
    }
}

/// The committed model and its ready-to-use handle.
pub struct Selected {
    pub model: String,
    pub provider: Arc<dyn LlmProvider>,
    /// Candidates rejected before this one, in probe order.
    pub rejected: Vec<(String, ProbeFailure)>,
}

impl std::fmt::Debug for Selected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selected")
            .field("model", &self.model)
            .field("rejected", &self.rejected)
            .finish()
    }
}

/// Probes candidate models in order.
pub struct ModelSelector<F: ProviderFactory> {
    factory: F,
    probe_params: GenerationParams,
}

impl<F: ProviderFactory> ModelSelector<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            probe_params: GenerationParams::probe(),
        }
    }

    pub fn with_probe_params(mut self, params: GenerationParams) -> Self {
        self.probe_params = params;
        self
    }

    /// Return the first candidate that answers a probe.
    ///
    /// Fails with `LlmError::NoAvailableModel` once every candidate is exhausted.
    pub async fn select(&self, candidates: &[String]) -> Result<Selected, LlmError> {
        let mut rejected = Vec::new();

        for model in candidates {
            match self.probe(model).await {
                Ok(provider) => {
                    info!(model = %model, "Model selected");
                    return Ok(Selected {
                        model: model.clone(),
                        provider,
                        rejected,
                    });
                }
                Err(failure) => {
                    warn!(model = %model, reason = %failure, "Model unavailable, trying next");
                    rejected.push((model.clone(), failure));
                }
            }
        }

        Err(LlmError::NoAvailableModel {
            tried: candidates.to_vec(),
        })
    }

    async fn probe(&self, model: &str) -> Result<Arc<dyn LlmProvider>, ProbeFailure> {
        let provider = self
            .factory
            .create(model)
            .map_err(|e| ProbeFailure::classify(&e))?;

        let request = CompletionRequest::new(PROBE_PROMPT).with_params(self.probe_params);
        provider
            .complete(request)
            .await
            .map_err(|e| ProbeFailure::classify(&e))?;

        Ok(provider)
    }
}
