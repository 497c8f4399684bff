//! Content-based severity classification
//!
//! Declared levels are free-form and inconsistent across producers, so the
//! severity is re-derived from the message text. Keyword classes are scanned
//! in precedence order and the first class with a hit wins:
//!
//! | Order | Severity  | Keywords                                       |
//! |-------|-----------|------------------------------------------------|
//! | 1     | `SUCCESS` | success, logged in, payment complete           |
//! | 2     | `ERROR`   | fail, error, unauthorized, denied              |
//! | 3     | `WARNING` | warn, deprecated, slow                         |
//! | 4     | `INFO`    | (default)                                      |
//!
//! A message mentioning both a success and a failure resolves to `SUCCESS`.

use crate::models::Severity;

const SUCCESS_KEYWORDS: &[&str] = &["success", "logged in", "payment complete"];
const ERROR_KEYWORDS: &[&str] = &["fail", "error", "unauthorized", "denied"];
const WARNING_KEYWORDS: &[&str] = &["warn", "deprecated", "slow"];

const RULES: &[(Severity, &[&str])] = &[
    (Severity::Success, SUCCESS_KEYWORDS),
    (Severity::Error, ERROR_KEYWORDS),
    (Severity::Warning, WARNING_KEYWORDS),
];

/// Classify a message. Total over all strings.
pub fn classify(message: &str) -> Severity {
    let folded = message.to_lowercase();

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| folded.contains(k)))
        .map(|(severity, _)| *severity)
        .unwrap_or(Severity::Info)
}
