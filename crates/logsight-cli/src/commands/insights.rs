//! Insights command - upload a file and show the narrative report

use std::path::Path;

use anyhow::Result;
use logsight_client::LogsightClient;

use crate::output::OutputContext;

pub async fn insights(client: &LogsightClient, file: &Path, ctx: &OutputContext) -> Result<()> {
    let response = client.insights_file(file).await?;

    ctx.info(&format!(
        "{} entries parsed, {} chunks indexed\n",
        response.entries.len(),
        response.indexed_chunks
    ));
    ctx.print_sections(&response.insights, &response.insights.sections());
    Ok(())
}
