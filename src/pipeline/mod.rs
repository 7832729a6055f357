//! Classification-and-routing pipeline.
//!
//! Every email flows through:
//! 1. `prompt::build_classification_prompt()`: email + taxonomy + directory summary
//! 2. `LlmProvider::complete()` on the selected model
//! 3. `parser::parse_model_response()`: tolerant JSON extraction
//! 4. `matcher::find_matching_staff()`: scored staff candidates
//!
//! `classifier::EmailClassifier` composes the steps and never fails:
//! backend and parse errors end up inside the returned result.

pub mod classifier;
pub mod matcher;
pub mod parser;
pub mod prompt;
pub mod types;

pub use classifier::EmailClassifier;
pub use matcher::{MatchConfig, RoutingGuess};
pub use types::{ClassificationResult, ClassificationState, EmailInput, RecommendedStaff};
