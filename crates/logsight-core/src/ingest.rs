//! Ingestion orchestrator
//!
//! Drives one sequential pass over an input: tokenize, parse, classify,
//! record into the shared aggregator, append to the returned entry list.
//! Ordering is preserved and the only suspension points are reads.

use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, BufReader};

use crate::aggregator::MetricsAggregator;
use crate::error::CoreResult;
use crate::lines::LineReader;
use crate::models::LogEntry;
use crate::parser::parse_line;

/// Outcome of one ingestion pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Conforming entries in input order
    pub entries: Vec<LogEntry>,
    /// Physical lines seen, blank ones included
    pub lines_read: usize,
    /// Non-blank lines that did not parse
    pub discarded: usize,
    /// Set when the input failed part-way; entries before the failure are kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated: Option<String>,
}

impl IngestReport {
    pub fn is_truncated(&self) -> bool {
        self.truncated.is_some()
    }
}

/// A parsed pass whose entries have not reached the aggregator yet.
///
/// Produced by [`Ingestor::parse`]; hand it to [`Ingestor::commit`] to record
/// the entries, or drop it to leave the aggregate untouched.
#[derive(Debug)]
pub struct PendingIngest {
    report: IngestReport,
    failure: Option<io::Error>,
}

impl PendingIngest {
    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    /// The read error that ended the pass early, if any
    pub fn failure(&self) -> Option<&io::Error> {
        self.failure.as_ref()
    }
}

/// Runs ingestion passes against a shared aggregator
#[derive(Debug, Clone)]
pub struct Ingestor {
    aggregator: Arc<MetricsAggregator>,
}

impl Ingestor {
    pub fn new(aggregator: Arc<MetricsAggregator>) -> Self {
        Self { aggregator }
    }

    pub fn aggregator(&self) -> &Arc<MetricsAggregator> {
        &self.aggregator
    }

    /// Ingest a whole stream, recording each entry as it is produced.
    ///
    /// A read failure before any byte arrived is an error and leaves the
    /// aggregate untouched. A later failure ends the pass early: the report
    /// carries what was parsed so far and `truncated` names the cause.
    pub async fn ingest<R>(&self, reader: R) -> CoreResult<IngestReport>
    where
        R: AsyncBufRead + Unpin,
    {
        let pending = self.run(reader, true).await?;
        Ok(self.finish(pending))
    }

    /// Parse a whole stream without touching the aggregator.
    ///
    /// Failure handling matches [`Ingestor::ingest`]; the caller inspects
    /// [`PendingIngest::failure`] and decides whether to [`Ingestor::commit`].
    pub async fn parse<R>(&self, reader: R) -> CoreResult<PendingIngest>
    where
        R: AsyncBufRead + Unpin,
    {
        self.run(reader, false).await
    }

    /// Record a parsed pass into the aggregator
    pub fn commit(&self, pending: PendingIngest) -> IngestReport {
        for entry in &pending.report.entries {
            self.aggregator.record(entry);
        }
        self.finish(pending)
    }

    async fn run<R>(&self, reader: R, record: bool) -> CoreResult<PendingIngest>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = LineReader::new(reader);
        let mut report = IngestReport::default();
        let mut failure = None;

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) if lines.bytes_read() == 0 => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(
                        line = lines.lines_read(),
                        bytes = lines.bytes_read(),
                        error = %e,
                        "Input failed mid-stream, keeping partial result"
                    );
                    report.truncated = Some(e.to_string());
                    failure = Some(e);
                    break;
                }
            };

            match parse_line(&line.text) {
                Some(parsed) => {
                    let entry = parsed.into_entry();
                    if record {
                        self.aggregator.record(&entry);
                    }
                    report.entries.push(entry);
                }
                None => {
                    tracing::trace!(line = line.number, "Discarding non-conforming line");
                    report.discarded += 1;
                }
            }
        }

        report.lines_read = lines.lines_read();
        Ok(PendingIngest { report, failure })
    }

    fn finish(&self, pending: PendingIngest) -> IngestReport {
        let report = pending.report;
        tracing::info!(
            entries = report.entries.len(),
            discarded = report.discarded,
            lines = report.lines_read,
            truncated = report.is_truncated(),
            "Ingestion pass complete"
        );
        report
    }

    /// Open and ingest a file
    pub async fn ingest_path(&self, path: impl AsRef<Path>) -> CoreResult<IngestReport> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        tracing::debug!(path = %path.display(), "Ingesting file");
        self.ingest(BufReader::new(file)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::models::Severity;
    use pretty_assertions::assert_eq;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, ReadBuf};

    fn ingestor() -> Ingestor {
        Ingestor::new(Arc::new(MetricsAggregator::new()))
    }

    #[tokio::test]
    async fn test_scenario_success_and_error() {
        let ingestor = ingestor();
        let input = b"[2025-08-03 12:45:12] INFO: User logged in\n\
                      [2025-08-03 12:46:00] ERROR: Payment failed, unauthorized access denied\n";
        let report = ingestor.ingest(&input[..]).await.unwrap();

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].severity, Severity::Success);
        assert_eq!(report.entries[0].declared_level, "INFO");
        assert_eq!(report.entries[1].severity, Severity::Error);

        let snapshot = ingestor.aggregator().snapshot();
        assert_eq!(snapshot.level(Severity::Success), 1);
        assert_eq!(snapshot.level(Severity::Error), 1);
        assert_eq!(snapshot.requests_per_minute.len(), 2);
    }

    #[tokio::test]
    async fn test_scenario_warning_beats_info() {
        let report = ingestor()
            .ingest(&b"[t] DEBUG: Slow response from upstream\n"[..])
            .await
            .unwrap();
        assert_eq!(report.entries[0].severity, Severity::Warning);
        assert_eq!(report.entries[0].declared_level, "DEBUG");
    }

    #[tokio::test]
    async fn test_scenario_garbage_only() {
        let ingestor = ingestor();
        let report = ingestor
            .ingest(&b"garbage\nmore garbage\n\n"[..])
            .await
            .unwrap();

        assert!(report.entries.is_empty());
        assert_eq!(report.discarded, 2);
        assert_eq!(report.lines_read, 3);
        assert_eq!(ingestor.aggregator().snapshot().total(), 0);
    }

    #[tokio::test]
    async fn test_scenario_mixed_newlines_match_unix() {
        let unix = ingestor()
            .ingest(&b"[a] INFO: one\n[b] WARN: deprecated api\n[c] ERROR: boom\n"[..])
            .await
            .unwrap();
        let mixed = ingestor()
            .ingest(&b"[a] INFO: one\r\n[b] WARN: deprecated api\r[c] ERROR: boom"[..])
            .await
            .unwrap();
        assert_eq!(unix.entries, mixed.entries);
    }

    #[tokio::test]
    async fn test_scenario_success_precedence() {
        let report = ingestor()
            .ingest(&b"[t] ERROR: login success after failed attempt\n"[..])
            .await
            .unwrap();
        assert_eq!(report.entries[0].severity, Severity::Success);
    }

    #[tokio::test]
    async fn test_reingest_is_idempotent_and_counts_grow() {
        let ingestor = ingestor();
        let input = b"[2025-08-03 12:45:12] INFO: GET /cart HTTP 404 from 10.0.0.1\nnoise\n";

        let first = ingestor.ingest(&input[..]).await.unwrap();
        let after_first = ingestor.aggregator().snapshot();
        let second = ingestor.ingest(&input[..]).await.unwrap();
        let after_second = ingestor.aggregator().snapshot();

        assert_eq!(first, second);
        assert_eq!(after_first.total(), 1);
        assert_eq!(after_second.total(), 2);
        assert_eq!(after_second.error_codes["404"], 2);
        assert_eq!(after_second.top_ips["10.0.0.1"], 2);
    }

    #[tokio::test]
    async fn test_only_conforming_lines_reach_aggregate() {
        let ingestor = ingestor();
        let input = b"[t] INFO: a\nbad line 500 from 10.9.9.9\n[t] INFO: b\n";
        let report = ingestor.ingest(&input[..]).await.unwrap();

        let snapshot = ingestor.aggregator().snapshot();
        assert_eq!(snapshot.total(), report.entries.len() as u64);
        assert!(snapshot.error_codes.is_empty());
        assert!(snapshot.top_ips.is_empty());
    }

    /// Yields `data` once, then fails every read
    struct FailAfter {
        data: Option<Vec<u8>>,
    }

    impl AsyncRead for FailAfter {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            match self.data.take() {
                Some(data) if !data.is_empty() => {
                    buf.put_slice(&data);
                    Poll::Ready(Ok(()))
                }
                _ => Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "peer went away",
                ))),
            }
        }
    }

    #[tokio::test]
    async fn test_mid_stream_failure_keeps_partial_entries() {
        let ingestor = ingestor();
        let reader = BufReader::new(FailAfter {
            data: Some(b"[t] INFO: first\n[t] INFO: sec".to_vec()),
        });
        let report = ingestor.ingest(reader).await.unwrap();

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].message, "first");
        assert!(report.truncated.as_deref().unwrap().contains("peer went away"));
        assert_eq!(ingestor.aggregator().snapshot().total(), 1);
    }

    #[tokio::test]
    async fn test_immediate_failure_is_error() {
        let ingestor = ingestor();
        let reader = BufReader::new(FailAfter { data: None });
        let result = ingestor.ingest(reader).await;

        assert!(matches!(result, Err(CoreError::Io(_))));
        assert_eq!(ingestor.aggregator().snapshot().total(), 0);
    }

    #[tokio::test]
    async fn test_parse_records_nothing_until_commit() {
        let ingestor = ingestor();
        let input = b"[2025-08-03 12:45:12] ERROR: GET /pay HTTP 500 from 10.0.0.1\nnoise\n";

        let pending = ingestor.parse(&input[..]).await.unwrap();
        assert_eq!(pending.report().entries.len(), 1);
        assert_eq!(pending.report().discarded, 1);
        assert!(pending.failure().is_none());
        assert_eq!(ingestor.aggregator().snapshot().total(), 0);

        let report = ingestor.commit(pending);
        let snapshot = ingestor.aggregator().snapshot();
        assert_eq!(snapshot.total(), report.entries.len() as u64);
        assert_eq!(snapshot.error_codes["500"], 1);
    }

    #[tokio::test]
    async fn test_dropped_partial_pass_leaves_aggregate_untouched() {
        let ingestor = ingestor();
        let reader = BufReader::new(FailAfter {
            data: Some(b"[t] INFO: first\n[t] INFO: second\n".to_vec()),
        });
        let pending = ingestor.parse(reader).await.unwrap();

        assert_eq!(pending.report().entries.len(), 2);
        assert!(pending.report().is_truncated());
        assert_eq!(
            pending.failure().map(io::Error::kind),
            Some(io::ErrorKind::BrokenPipe)
        );
        drop(pending);
        assert_eq!(ingestor.aggregator().snapshot().total(), 0);
    }

    #[tokio::test]
    async fn test_ingest_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "[2025-08-03 12:45:12] INFO: payment complete\n").unwrap();

        let report = ingestor().ingest_path(&path).await.unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].severity, Severity::Success);
    }

    #[tokio::test]
    async fn test_ingest_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ingestor().ingest_path(dir.path().join("absent.log")).await;
        assert!(matches!(result, Err(CoreError::Io(_))));
    }
}
