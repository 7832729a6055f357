//! Tolerant extraction of a JSON object from free-form model output.
//!
//! Backends are asked for bare JSON but regularly wrap it in markdown
//! fences, prefix it with reasoning, or restate a corrected answer in a
//! later block. Attempts, first success wins:
//!
//! 1. fenced blocks, last to first
//! 2. the whole trimmed text
//! 3. the span from the first `{` to the last `}`
//!
//! Nothing here returns an error: an empty map means "no object found".

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

/// A decoded top-level JSON object.
pub type JsonObject = Map<String, Value>;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*\n(.*?)```").expect("fenced block regex is valid")
});

/// Decode the best JSON object found in `text`, or an empty map.
pub fn parse_model_response(text: &str) -> JsonObject {
    let text = text.trim();

    let blocks: Vec<&str> = FENCED_BLOCK
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    for block in blocks.iter().rev() {
        if let Some(object) = decode_object(block.trim()) {
            return object;
        }
    }
    if !blocks.is_empty() {
        debug!(blocks = blocks.len(), "No fenced block decoded as a JSON object");
    }

    if let Some(object) = decode_object(text) {
        return object;
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}'))
        && end > start
        && let Some(object) = decode_object(&text[start..=end])
    {
        return object;
    }

    JsonObject::new()
}

fn decode_object(candidate: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}
