//! Parse command - classify a file locally, no server involved

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use logsight_core::{Ingestor, MetricsAggregator, UploadedEntry};

use crate::output::{EntryRow, MetricRow, OutputContext};

/// Parse and classify a log file in-process
pub async fn parse(file: &Path, show_metrics: bool, ctx: &OutputContext) -> Result<()> {
    let ingestor = Ingestor::new(Arc::new(MetricsAggregator::new()));
    let report = ingestor
        .ingest_path(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    if let Some(reason) = &report.truncated {
        ctx.warn(&format!("Input ended early ({}); results are partial", reason));
    }

    let entry_count = report.entries.len();
    if show_metrics {
        ctx.print(&MetricRow::from_snapshot(&ingestor.aggregator().snapshot()));
    } else {
        let rows: Vec<EntryRow> = report
            .entries
            .into_iter()
            .map(|entry| EntryRow::from(UploadedEntry::from(entry)))
            .collect();
        ctx.print(&rows);
    }

    ctx.info(&format!(
        "{} entries from {} lines, {} discarded",
        entry_count, report.lines_read, report.discarded
    ));
    Ok(())
}
