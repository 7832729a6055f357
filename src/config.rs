//! Configuration types.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::GenerationParams;
use crate::pipeline::matcher::MatchConfig;

/// Candidate models in priority order. Later entries draw on separate quota.
pub const DEFAULT_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.5-flash",
    "gemini-2.0-flash-lite",
    "gemini-2.5-flash-lite",
];

/// Default staff directory location (written by the directory ETL job).
pub const DEFAULT_DIRECTORY_PATH: &str = "data/researcher_db.json";

/// Public generative-language endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Classifier configuration.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Backend credential.
    pub api_key: SecretString,
    /// Backend base URL.
    pub base_url: String,
    /// Candidate model identifiers, highest priority first.
    pub models: Vec<String>,
    /// Staff directory JSON path.
    pub directory_path: PathBuf,
    /// Generation parameters for the classification call.
    pub generation: GenerationParams,
    /// Generation parameters for model probes.
    pub probe: GenerationParams,
    /// Staff matching weights and limit.
    pub matching: MatchConfig,
}

impl ClassifierConfig {
    /// Build a config with defaults around the given credential.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            directory_path: PathBuf::from(DEFAULT_DIRECTORY_PATH),
            generation: GenerationParams::classification(),
            probe: GenerationParams::probe(),
            matching: MatchConfig::default(),
        }
    }

    /// Load configuration from the environment.
    ///
    /// `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) is required; everything else
    /// falls back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired {
                key: "GEMINI_API_KEY".to_string(),
                hint: "export GEMINI_API_KEY='your-key' (GOOGLE_API_KEY is also accepted)"
                    .to_string(),
            })?;

        let mut config = Self::new(SecretString::from(api_key));

        if let Ok(url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(raw) = std::env::var("EMAIL_ROUTER_MODELS") {
            let models = parse_model_list(&raw);
            if models.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "EMAIL_ROUTER_MODELS".to_string(),
                    message: "expected a comma-separated list of model names".to_string(),
                });
            }
            config.models = models;
        }

        if let Ok(path) = std::env::var("EMAIL_ROUTER_DIRECTORY") {
            config.directory_path = PathBuf::from(path);
        }

        config.matching.limit = std::env::var("EMAIL_ROUTER_MATCH_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(config.matching.limit);

        Ok(config)
    }
}

/// Split a comma-separated model list, dropping blanks.
pub fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
