//! Shared types for the classification pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::StaffRecord;

// ── Email input ─────────────────────────────────────────────────────

/// An inbound email to classify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailInput {
    pub subject: String,
    pub body: String,
    /// Sender address, empty when unknown.
    #[serde(default)]
    pub sender: String,
    /// Free-form date, empty when unknown.
    #[serde(default)]
    pub date: String,
}

impl EmailInput {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            sender: String::new(),
            date: String::new(),
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }
}

// ── Staff recommendation ────────────────────────────────────────────

/// A directory entry proposed as a handler, with its match score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedStaff {
    #[serde(flatten)]
    pub record: StaffRecord,
    pub match_score: u32,
}

// ── Classification state ────────────────────────────────────────────

/// Progress of a single classification request.
///
/// `BackendFailed`, `ParseFailed` and `Done` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationState {
    #[default]
    Built,
    Requested,
    Responded,
    BackendFailed,
    Parsed,
    ParseFailed,
    Matched,
    Done,
}

impl ClassificationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::BackendFailed | Self::ParseFailed | Self::Done)
    }

    /// Short label for logging.
    pub fn label(self) -> &'static str {
        match self {
            Self::Built => "built",
            Self::Requested => "requested",
            Self::Responded => "responded",
            Self::BackendFailed => "backend_failed",
            Self::Parsed => "parsed",
            Self::ParseFailed => "parse_failed",
            Self::Matched => "matched",
            Self::Done => "done",
        }
    }
}

// ── Classification result ───────────────────────────────────────────

/// Outcome of classifying one email.
///
/// Every field has a safe default, so a request that failed half-way is
/// still a well-formed value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: String,
    pub category_description: String,
    pub urgency: String,
    pub urgency_reason: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub recommended_department: String,
    pub recommended_lab: String,
    pub recommended_team: String,
    pub recommended_researchers: Vec<RecommendedStaff>,
    pub suggested_actions: Vec<String>,
    pub raw_response: String,
    /// State the request ended in.
    pub state: ClassificationState,
    /// When the request finished.
    pub classified_at: Option<DateTime<Utc>>,
}

impl ClassificationResult {
    /// Whether the backend produced a usable structured answer.
    pub fn is_success(&self) -> bool {
        self.state == ClassificationState::Done
    }
}
