//! Log entry models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classifier;

/// Normalized severity derived from message content.
///
/// The set is closed: every classified entry carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Completed actions: logins, successful payments
    Success,
    /// Failures, denials, unauthorized access
    Error,
    /// Degradation: slowness, deprecations
    Warning,
    /// Everything else
    Info,
}

impl Severity {
    /// All severities in classifier precedence order
    pub const ALL: [Severity; 4] = [
        Severity::Success,
        Severity::Error,
        Severity::Warning,
        Severity::Info,
    ];

    /// Classify a free-text message (see [`classifier::classify`])
    pub fn classify(message: &str) -> Self {
        classifier::classify(message)
    }

    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "SUCCESS",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }

    /// How much operator attention the severity calls for (higher is worse)
    pub fn urgency(&self) -> u8 {
        match self {
            Severity::Success => 0,
            Severity::Info => 1,
            Severity::Warning => 2,
            Severity::Error => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    /// Case-insensitive; accepts the common `WARN` spelling too
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" => Ok(Severity::Success),
            "ERROR" => Ok(Severity::Error),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "INFO" => Ok(Severity::Info),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}

/// One structured, classified log line.
///
/// `severity` is always `Severity::classify(&message)`; the line's own level
/// token is kept verbatim in `declared_level` even when the two disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Bracketed prefix captured verbatim (no calendar parsing)
    pub timestamp: String,
    /// Level token the line declared, unmodified
    pub declared_level: String,
    /// Classifier verdict
    pub severity: Severity,
    /// Remaining free text
    pub message: String,
}

impl LogEntry {
    /// Build an entry, deriving the severity from the message
    pub fn new(
        timestamp: impl Into<String>,
        declared_level: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        Self {
            timestamp: timestamp.into(),
            declared_level: declared_level.into(),
            severity: Severity::classify(&message),
            message,
        }
    }

    /// True when the classifier disagrees with the declared level
    pub fn is_reclassified(&self) -> bool {
        self.declared_level.parse::<Severity>().ok() != Some(self.severity)
    }
}
