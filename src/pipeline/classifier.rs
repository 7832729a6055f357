//! Email classifier: one prompt, backend call, parse and match per email.
//!
//! Flow:
//! 1. Build the prompt from the email, taxonomy and directory summary
//! 2. One backend call with low-temperature parameters
//! 3. Tolerant JSON extraction, per-field defaults
//! 4. Staff matching against the directory
//!
//! Backend and parse failures never escape: they are recorded in the
//! returned `ClassificationResult` and the request ends early.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::directory::StaffDirectory;
use crate::llm::provider::{CompletionRequest, FinishReason, GenerationParams, LlmProvider};
use crate::pipeline::matcher::{MatchConfig, RoutingGuess, find_matching_staff};
use crate::pipeline::parser::{JsonObject, parse_model_response};
use crate::pipeline::prompt::build_classification_prompt;
use crate::pipeline::types::{ClassificationResult, ClassificationState, EmailInput};
use crate::taxonomy::Taxonomy;

/// Characters of raw output kept in the parse-failure diagnostic.
const RAW_EXCERPT_CHARS: usize = 500;

/// Summary recorded when no JSON object could be recovered.
pub const PARSE_FAILED_SUMMARY: &str = "JSON 파싱 실패: 원본 응답을 확인하세요";

/// Prefix of the summary recorded when the backend call fails.
pub const BACKEND_FAILED_PREFIX: &str = "분류 실패";

/// Directory summary shown to the backend when no staff are loaded.
pub const EMPTY_DIRECTORY_SUMMARY: &str = "(연구원 DB 없음)";

/// Classifies emails against a fixed taxonomy and proposes staff.
///
/// Holds only read-only state; each call builds its own result.
pub struct EmailClassifier {
    llm: Arc<dyn LlmProvider>,
    directory: Arc<StaffDirectory>,
    taxonomy: Arc<Taxonomy>,
    department_summary: String,
    generation: GenerationParams,
    matching: MatchConfig,
}

impl EmailClassifier {
    /// Create a classifier. The directory summary is computed once here.
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        directory: Arc<StaffDirectory>,
        taxonomy: Arc<Taxonomy>,
    ) -> Self {
        let department_summary = if directory.is_empty() {
            EMPTY_DIRECTORY_SUMMARY.to_string()
        } else {
            directory.department_summary()
        };
        Self {
            llm,
            directory,
            taxonomy,
            department_summary,
            generation: GenerationParams::classification(),
            matching: MatchConfig::default(),
        }
    }

    pub fn with_generation_params(mut self, params: GenerationParams) -> Self {
        self.generation = params;
        self
    }

    pub fn with_match_config(mut self, config: MatchConfig) -> Self {
        self.matching = config;
        self
    }

    pub fn department_summary(&self) -> &str {
        &self.department_summary
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Classify one email. Always returns a well-formed result.
    pub async fn classify(&self, email: &EmailInput) -> ClassificationResult {
        let mut result = ClassificationResult::default();

        let prompt = build_classification_prompt(email, &self.taxonomy, &self.department_summary);
        result.state = ClassificationState::Built;

        info!(
            model = %self.llm.model_name(),
            subject = %email.subject,
            "Classifying email"
        );

        let request = CompletionRequest::new(prompt).with_params(self.generation);
        result.state = ClassificationState::Requested;

        let response = match self.llm.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(model = %self.llm.model_name(), error = %e, "Backend call failed");
                result.summary = format!("{BACKEND_FAILED_PREFIX}: {e}");
                return finish(result, ClassificationState::BackendFailed);
            }
        };
        result.raw_response = response.content;
        result.state = ClassificationState::Responded;
        debug!(
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Backend responded"
        );
        if response.finish_reason == FinishReason::Length {
            warn!(
                output_tokens = response.output_tokens,
                max_output_tokens = self.generation.max_output_tokens,
                "Backend reply hit the output token limit and may be truncated"
            );
        }

        let parsed = parse_model_response(&result.raw_response);
        if parsed.is_empty() {
            let excerpt: String = result.raw_response.chars().take(RAW_EXCERPT_CHARS).collect();
            warn!(raw_response = %excerpt, "Failed to parse backend response as JSON");
            result.summary = PARSE_FAILED_SUMMARY.to_string();
            return finish(result, ClassificationState::ParseFailed);
        }
        result.state = ClassificationState::Parsed;

        self.apply_fields(&mut result, &parsed);

        if self.directory.is_empty() {
            debug!("Staff directory empty, skipping matching");
        } else {
            let guess = RoutingGuess {
                department: &result.recommended_department,
                lab: &result.recommended_lab,
                team: &result.recommended_team,
            };
            let matches = find_matching_staff(&self.directory, &guess, &self.matching);
            debug!(count = matches.len(), "Staff matching complete");
            result.recommended_researchers = matches;
        }
        result.state = ClassificationState::Matched;

        info!(
            category = %result.category,
            urgency = %result.urgency,
            candidates = result.recommended_researchers.len(),
            "Email classified"
        );
        finish(result, ClassificationState::Done)
    }

    /// Classify emails one after another.
    pub async fn classify_batch(&self, emails: &[EmailInput]) -> Vec<ClassificationResult> {
        let mut results = Vec::with_capacity(emails.len());
        for email in emails {
            results.push(self.classify(email).await);
        }
        results
    }

    /// Copy parsed fields into the result with per-field defaults.
    fn apply_fields(&self, result: &mut ClassificationResult, parsed: &JsonObject) {
        result.category = string_field(parsed, "category")
            .unwrap_or_else(|| self.taxonomy.fallback_category.clone());
        result.category_description =
            string_field(parsed, "category_description").unwrap_or_default();
        result.urgency =
            string_field(parsed, "urgency").unwrap_or_else(|| self.taxonomy.default_urgency.clone());
        result.urgency_reason = string_field(parsed, "urgency_reason").unwrap_or_default();
        result.summary = string_field(parsed, "summary").unwrap_or_default();
        result.key_points = string_list(parsed, "key_points");
        result.recommended_department =
            string_field(parsed, "recommended_department").unwrap_or_default();
        result.recommended_lab = string_field(parsed, "recommended_lab").unwrap_or_default();
        result.recommended_team = string_field(parsed, "recommended_team").unwrap_or_default();
        result.suggested_actions = string_list(parsed, "suggested_actions");

        if !self.taxonomy.is_known_category(&result.category) {
            warn!(category = %result.category, "Backend returned a category outside the taxonomy");
        }
        if !self.taxonomy.is_known_urgency(&result.urgency) {
            warn!(urgency = %result.urgency, "Backend returned an unknown urgency level");
        }
    }
}

fn finish(mut result: ClassificationResult, state: ClassificationState) -> ClassificationResult {
    debug_assert!(state.is_terminal());
    result.state = state;
    result.classified_at = Some(Utc::now());
    debug!(state = state.label(), "Classification finished");
    result
}

/// A string-valued field; missing or non-string values count as absent.
fn string_field(parsed: &JsonObject, key: &str) -> Option<String> {
    match parsed.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// A list of strings. Scalars inside the list are stringified, nulls and
/// nested structures dropped. A bare string becomes a one-item list.
fn string_list(parsed: &JsonObject, key: &str) -> Vec<String> {
    match parsed.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}
