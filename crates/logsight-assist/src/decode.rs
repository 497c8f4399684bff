//! Tolerant decoding of collaborator text
//!
//! Models are asked for bare JSON but routinely wrap it in markdown fences or
//! surround it with prose. Decoding tries, in order: the text as-is with
//! fences removed, then the outermost `{...}` span. Anything still unparseable
//! decodes to an empty payload.

use logsight_core::{AssistAnswer, InsightReport};
use serde_json::Value;

/// Best-effort JSON value from model output; `Value::Null` when nothing parses
pub fn decode_value(text: &str) -> Value {
    let unfenced = strip_fences(text);
    if let Ok(value) = serde_json::from_str::<Value>(unfenced) {
        return value;
    }

    if let (Some(start), Some(end)) = (unfenced.find('{'), unfenced.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&unfenced[start..=end]) {
                return value;
            }
        }
    }

    tracing::warn!(chars = text.len(), "Collaborator text is not JSON, using empty payload");
    Value::Null
}

/// Decode an answer payload, keeping well-formed fields only
pub fn decode_answer(text: &str) -> AssistAnswer {
    AssistAnswer::from_value(&decode_value(text))
}

/// Decode an insights payload, keeping well-formed fields only
pub fn decode_insights(text: &str) -> InsightReport {
    InsightReport::from_value(&decode_value(text))
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` fence and a trailing ```` ``` ````
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json", "JSON", ...) up to the first newline
    let body = match rest.find('\n') {
        Some(newline) if rest[..newline].trim().chars().all(char::is_alphanumeric) => {
            &rest[newline + 1..]
        }
        _ => rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest),
    };

    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
