//! Ask command - question answering over uploaded logs

use anyhow::{bail, Result};
use logsight_client::LogsightClient;

use crate::output::OutputContext;

pub async fn ask(
    client: &LogsightClient,
    question: &str,
    k: Option<usize>,
    ctx: &OutputContext,
) -> Result<()> {
    if question.trim().is_empty() {
        bail!("Question must not be empty");
    }

    let response = client.query(question, k).await?;
    if response.context_size == 0 {
        ctx.warn("No uploaded entries match this question");
    }
    ctx.print_sections(&response.answer, &response.answer.sections());
    Ok(())
}
