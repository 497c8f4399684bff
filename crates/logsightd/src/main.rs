//! logsightd - Logsight server daemon
//!
//! Usage:
//!   logsightd [config.toml] [--port 5000] [--provider gemini]

mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use logsight_api::{create_router, AppState};
use logsight_core::{CorpusStore, MetricsAggregator};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Args, DaemonConfig};

const DEFAULT_LOG_FILTER: &str = concat!(
    "logsightd=info,logsight_api=info,logsight_core=info,",
    "logsight_assist=info,tower_http=info"
);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = DaemonConfig::from_args(&args)?;

    match &args.config {
        Some(path) => tracing::info!("Starting logsightd with config {}", path.display()),
        None => tracing::info!("Starting logsightd with default configuration"),
    }

    let aggregator = Arc::new(MetricsAggregator::with_top_ips(config.metrics.top_ips));
    let corpus = Arc::new(CorpusStore::new(config.corpus.store.clone()));
    let assistant = config.assistant.build_or_local();
    tracing::info!(
        assistant = assistant.name(),
        max_documents = config.corpus.store.max_documents,
        top_ips = config.metrics.top_ips,
        "Engine ready"
    );

    let state = AppState::new(aggregator, corpus, assistant)
        .with_context_entries(config.corpus.context_entries)
        .with_max_upload_bytes(config.server.max_upload_bytes);
    let app = create_router(state);

    let addr = config.listen_addr();
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
