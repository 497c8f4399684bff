//! HTTP wire shapes shared by the API server and its client

use serde::{Deserialize, Serialize};

use super::assist::{AssistAnswer, InsightReport};
use super::entry::{LogEntry, Severity};

/// One entry as returned by the upload endpoints.
///
/// `level` is the classifier's verdict; `originalLevel` is what the line
/// declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedEntry {
    pub timestamp: String,
    pub level: Severity,
    #[serde(rename = "originalLevel")]
    pub original_level: String,
    pub message: String,
}

impl From<&LogEntry> for UploadedEntry {
    fn from(entry: &LogEntry) -> Self {
        Self {
            timestamp: entry.timestamp.clone(),
            level: entry.severity,
            original_level: entry.declared_level.clone(),
            message: entry.message.clone(),
        }
    }
}

impl From<LogEntry> for UploadedEntry {
    fn from(entry: LogEntry) -> Self {
        Self {
            timestamp: entry.timestamp,
            level: entry.severity,
            original_level: entry.declared_level,
            message: entry.message,
        }
    }
}

/// Response for the insights endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub entries: Vec<UploadedEntry>,
    #[serde(default)]
    pub insights: InsightReport,
    /// Corpus documents added by this upload
    pub indexed_chunks: usize,
}

/// Request body for the query endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub question: Option<String>,
    /// Number of context documents to retrieve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<usize>,
}

/// Response for the query endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    pub question: String,
    #[serde(flatten)]
    pub answer: AssistAnswer,
    /// Number of corpus documents handed to the collaborator
    pub context_size: usize,
}
