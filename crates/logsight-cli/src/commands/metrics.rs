//! Metrics command - aggregate counters from the server

use anyhow::Result;
use logsight_client::LogsightClient;

use crate::output::{MetricRow, OutputContext, OutputFormat};

pub async fn metrics(client: &LogsightClient, ctx: &OutputContext) -> Result<()> {
    let snapshot = client.metrics().await?;

    if ctx.format == OutputFormat::Json {
        // Keep the server's shape rather than the flattened rows
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    ctx.print(&MetricRow::from_snapshot(&snapshot));
    ctx.info(&format!("{} entries recorded", snapshot.total()));
    Ok(())
}
