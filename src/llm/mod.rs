//! LLM integration for the email router.
//!
//! - `provider`: the `LlmProvider` trait and request/response types
//! - `rig_adapter`: bridges rig completion models to `LlmProvider`
//! - `gemini`: Gemini `generateContent` backend built on rig
//! - `selector`: probe-based model fallback over a priority list

pub mod gemini;
pub mod provider;
pub mod rig_adapter;
pub mod selector;

pub use gemini::create_gemini_provider;
pub use provider::*;
pub use rig_adapter::RigAdapter;
pub use selector::{ModelSelector, ProbeFailure, ProviderFactory, Selected};

use std::sync::Arc;

use secrecy::SecretString;

use crate::error::LlmError;

/// Factory producing Gemini clients that share one credential and endpoint.
pub fn gemini_factory(
    api_key: SecretString,
    base_url: String,
) -> impl Fn(&str) -> Result<Arc<dyn LlmProvider>, LlmError> {
    move |model: &str| create_gemini_provider(&api_key, &base_url, model)
}
