//! Error types for the email router.

use std::path::PathBuf;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM backend errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited: {reason}")]
    RateLimited { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Model {model} not available on provider {provider}")]
    ModelNotAvailable { provider: String, model: String },

    #[error("No available model (tried: {})", tried.join(", "))]
    NoAvailableModel { tried: Vec<String> },
}

impl LlmError {
    /// Whether this failure signals quota exhaustion rather than a hard error.
    pub fn is_quota(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::RequestFailed { reason, .. } => {
                reason.contains("429") || reason.contains("RESOURCE_EXHAUSTED")
            }
            _ => false,
        }
    }
}

/// Staff directory errors.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Directory file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed directory JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reading an email from a file or the terminal.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Email file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Email body is empty")]
    EmptyBody,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
