//! Assistant trait - the seam to the external AI collaborator

use async_trait::async_trait;
use logsight_core::{AssistAnswer, CorpusDocument, InsightReport, LogEntry};

use crate::error::AssistResult;

/// A service that turns log data into narrative payloads.
///
/// Implementations return partial payloads rather than failing on malformed
/// output; `Err` is reserved for not reaching the service at all.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Answer `question` using only the retrieved `context`
    async fn answer(
        &self,
        question: &str,
        context: &[CorpusDocument],
    ) -> AssistResult<AssistAnswer>;

    /// Summarize freshly uploaded entries
    async fn insights(&self, entries: &[LogEntry]) -> AssistResult<InsightReport>;
}
