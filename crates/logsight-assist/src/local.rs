//! Credential-less fallback assistant
//!
//! Produces count-based payloads from the data at hand without calling out
//! anywhere. Used when no provider is configured or its key is missing.

use async_trait::async_trait;
use logsight_core::{AssistAnswer, CorpusDocument, InsightReport, LogEntry, Severity};

use crate::assistant::Assistant;
use crate::error::AssistResult;

/// Documents quoted when an answer has to fall back to raw evidence
pub const FALLBACK_CITATIONS: usize = 5;
/// Characters kept per fallback citation
pub const CITATION_CHARS: usize = 220;

const MAX_ANOMALIES: usize = 5;

/// Raw evidence lines: the first few documents, truncated
pub fn fallback_citations(context: &[CorpusDocument]) -> Vec<String> {
    context
        .iter()
        .take(FALLBACK_CITATIONS)
        .map(|doc| doc.content.chars().take(CITATION_CHARS).collect())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct LocalAssistant;

impl LocalAssistant {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Assistant for LocalAssistant {
    fn name(&self) -> &str {
        "local"
    }

    async fn answer(
        &self,
        _question: &str,
        context: &[CorpusDocument],
    ) -> AssistResult<AssistAnswer> {
        if context.is_empty() {
            return Ok(AssistAnswer {
                summary: Some("No log entries match this question.".to_string()),
                ..Default::default()
            });
        }

        let worst = context
            .iter()
            .map(|doc| doc.level)
            .max_by_key(Severity::urgency)
            .unwrap_or(Severity::Info);

        Ok(AssistAnswer {
            summary: Some(format!(
                "Found {} matching log entries; no language model configured.",
                context.len()
            )),
            severity: Some(worst.to_string()),
            findings: Some(
                context
                    .iter()
                    .take(FALLBACK_CITATIONS)
                    .map(|doc| format!("[{}] [{}] {}", doc.timestamp, doc.level, doc.content))
                    .collect(),
            ),
            recommendations: None,
            citations: Some(fallback_citations(context)),
        })
    }

    async fn insights(&self, entries: &[LogEntry]) -> AssistResult<InsightReport> {
        let errors = entries.iter().filter(|e| e.severity == Severity::Error).count();
        let warnings = entries.iter().filter(|e| e.severity == Severity::Warning).count();

        let anomalies: Vec<String> = entries
            .iter()
            .filter(|e| matches!(e.severity, Severity::Error | Severity::Warning))
            .take(MAX_ANOMALIES)
            .map(|e| format!("[{}] {}: {}", e.timestamp, e.severity, e.message))
            .collect();

        Ok(InsightReport {
            summary: Some(format!(
                "Parsed {} entries; {} errors, {} warnings.",
                entries.len(),
                errors,
                warnings
            )),
            threat_level: Some(if errors > 0 { "Medium" } else { "Low" }.to_string()),
            anomalies: (!anomalies.is_empty()).then_some(anomalies),
            insights: Some(vec!["Counts only; no language model configured.".to_string()]),
            recommendations: Some(vec![
                "Configure an assistant provider for deeper analysis.".to_string(),
            ]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsight_core::{CorpusConfig, CorpusStore};
    use pretty_assertions::assert_eq;

    fn entries() -> Vec<LogEntry> {
        vec![
            LogEntry::new("t1", "INFO", "User logged in"),
            LogEntry::new("t2", "ERROR", "Payment failed"),
            LogEntry::new("t3", "INFO", "Slow checkout"),
        ]
    }

    #[tokio::test]
    async fn test_insights_counts() {
        let report = LocalAssistant::new().insights(&entries()).await.unwrap();
        assert_eq!(
            report.summary.as_deref(),
            Some("Parsed 3 entries; 1 errors, 1 warnings.")
        );
        assert_eq!(report.threat_level.as_deref(), Some("Medium"));
        assert_eq!(report.anomalies.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_insights_low_threat_without_errors() {
        let report = LocalAssistant::new()
            .insights(&entries()[..1])
            .await
            .unwrap();
        assert_eq!(report.threat_level.as_deref(), Some("Low"));
        assert_eq!(report.anomalies, None);
    }

    #[tokio::test]
    async fn test_answer_cites_context() {
        let corpus = CorpusStore::new(CorpusConfig::default());
        corpus.index(&entries());
        let context = corpus.search("payment checkout", 8);

        let answer = LocalAssistant::new().answer("payment?", &context).await.unwrap();
        assert_eq!(answer.parsed_severity(), Some(Severity::Error));
        assert_eq!(answer.citations.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_answer_without_context() {
        let answer = LocalAssistant::new().answer("anything", &[]).await.unwrap();
        assert!(answer.summary.is_some());
        assert_eq!(answer.citations, None);
    }

    #[test]
    fn test_fallback_citations_truncate() {
        let corpus = CorpusStore::new(CorpusConfig::default());
        let long: Vec<LogEntry> = (0..7)
            .map(|i| LogEntry::new("t", "INFO", format!("disk {} {}", i, "é".repeat(300))))
            .collect();
        corpus.index(&long);
        let docs = corpus.search("disk", 10);

        let citations = fallback_citations(&docs);
        assert_eq!(citations.len(), FALLBACK_CITATIONS);
        assert!(citations.iter().all(|c| c.chars().count() == CITATION_CHARS));
    }
}
