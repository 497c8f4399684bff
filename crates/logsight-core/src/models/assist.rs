//! External collaborator payloads
//!
//! The collaborator (an LLM service) returns loosely shaped JSON. Both payload
//! types below are partial records: every field is optional, and decoding
//! from a `serde_json::Value` keeps whatever is well-formed and drops the
//! rest. Display code renders [`Section`]s, which only exist for fields that
//! are present and non-empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entry::Severity;

/// Answer to a question asked against the parsed corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Expected to be one of the four severities; kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub findings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    /// Opaque references back into the corpus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
}

impl AssistAnswer {
    /// Decode from an arbitrary JSON value, keeping well-formed fields only
    pub fn from_value(value: &Value) -> Self {
        Self {
            summary: text_field(value, "summary"),
            severity: text_field(value, "severity"),
            findings: list_field(value, "findings"),
            recommendations: list_field(value, "recommendations"),
            citations: list_field(value, "citations"),
        }
    }

    /// Severity, when the collaborator used one of the known names
    pub fn parsed_severity(&self) -> Option<Severity> {
        self.severity.as_deref().and_then(|s| s.parse().ok())
    }

    /// Renderable sections, in display order
    pub fn sections(&self) -> Vec<Section> {
        let mut sections = Vec::new();
        push_text(&mut sections, "Summary", &self.summary);
        push_text(&mut sections, "Severity", &self.severity);
        push_list(&mut sections, "Findings", &self.findings);
        push_list(&mut sections, "Recommendations", &self.recommendations);
        push_list(&mut sections, "Citations", &self.citations);
        sections
    }

    /// Nothing to show
    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }
}

/// Narrative insights for an uploaded file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threat_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomalies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
}

impl InsightReport {
    /// Decode from an arbitrary JSON value, keeping well-formed fields only
    pub fn from_value(value: &Value) -> Self {
        Self {
            summary: text_field(value, "summary"),
            threat_level: text_field(value, "threat_level"),
            anomalies: list_field(value, "anomalies"),
            insights: list_field(value, "insights"),
            recommendations: list_field(value, "recommendations"),
        }
    }

    /// Renderable sections, in display order
    pub fn sections(&self) -> Vec<Section> {
        let mut sections = Vec::new();
        push_text(&mut sections, "Summary", &self.summary);
        push_text(&mut sections, "Threat level", &self.threat_level);
        push_list(&mut sections, "Anomalies", &self.anomalies);
        push_list(&mut sections, "Insights", &self.insights);
        push_list(&mut sections, "Recommendations", &self.recommendations);
        sections
    }

    /// Nothing to show
    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }
}

/// One displayable part of a collaborator payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Text(String),
    List(Vec<String>),
}

fn push_text(sections: &mut Vec<Section>, title: &'static str, value: &Option<String>) {
    if let Some(text) = value.as_ref().filter(|t| !t.trim().is_empty()) {
        sections.push(Section {
            title,
            body: SectionBody::Text(text.clone()),
        });
    }
}

fn push_list(sections: &mut Vec<Section>, title: &'static str, value: &Option<Vec<String>>) {
    if let Some(items) = value.as_ref().filter(|items| !items.is_empty()) {
        sections.push(Section {
            title,
            body: SectionBody::List(items.clone()),
        });
    }
}

/// String field; numbers and booleans are stringified, anything else is absent
fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// List field; a bare string becomes a one-item list, nulls and nested
/// containers inside the list are skipped
fn list_field(value: &Value, key: &str) -> Option<Vec<String>> {
    match value.get(key)? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                })
                .collect(),
        ),
        Value::String(s) => Some(vec![s.clone()]),
        _ => None,
    }
}
