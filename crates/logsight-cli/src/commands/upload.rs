//! Upload command - send a file to the server for classification

use std::path::Path;

use anyhow::Result;
use logsight_client::LogsightClient;

use crate::output::{EntryRow, OutputContext};

/// Stream a log file to the server and list the classified entries
pub async fn upload(client: &LogsightClient, file: &Path, ctx: &OutputContext) -> Result<()> {
    let entries = client.upload_file(file).await?;
    let count = entries.len();

    let rows: Vec<EntryRow> = entries.into_iter().map(EntryRow::from).collect();
    ctx.print(&rows);
    ctx.success(&format!("Uploaded {} entries", count));
    Ok(())
}
