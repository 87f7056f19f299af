//! Output extraction
//!
//! Recover one JSON object from free model text. Surrounding prose and code
//! fences are tolerated; the object itself must parse as-is.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use super::error::ExtractionError;

/// Generic key/value payload recovered from a response
pub type Payload = Map<String, Value>;

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+.-]*[ \t]*\r?\n?").unwrap());

const FENCE: &str = "```";

/// Extract the structured payload from raw model text
pub fn extract(raw_text: &str) -> Result<Payload, ExtractionError> {
    if raw_text.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }

    let text = strip_fences(raw_text);

    let Some(start) = text.find('{') else {
        return Err(ExtractionError::NoDelimitedPayload);
    };
    // An opening brace that is never closed is a truncated payload.
    let candidate = match text.rfind('}') {
        Some(end) if end > start => &text[start..=end],
        _ => return Err(ExtractionError::MalformedPayload),
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ExtractionError::MalformedPayload),
        Err(e) => {
            debug!("Payload parse failed: {}", e);
            Err(ExtractionError::MalformedPayload)
        }
    }
}

/// Peel fence markers while the whole text is wrapped in them, leaving the
/// innermost fenced content.
fn strip_fences(text: &str) -> &str {
    let mut current = text.trim();

    while current.len() >= 2 * FENCE.len()
        && current.starts_with(FENCE)
        && current.ends_with(FENCE)
    {
        let Some(open) = OPENING_FENCE.find(current) else {
            break;
        };
        let close = current.len() - FENCE.len();
        if open.end() > close {
            break;
        }
        current = current[open.end()..close].trim();
    }

    current
}
