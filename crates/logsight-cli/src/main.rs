//! logsight - command-line front end for Logsight
//!
//! `parse` works on a local file without a server; every other command talks
//! to a running `logsightd`.

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use logsight_client::LogsightClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "logsight")]
#[command(author, version, about = "Log classification, metrics and questions")]
#[command(propagate_version = true)]
struct Cli {
    /// Server URL [default: http://localhost:5000]
    #[arg(short, long, env = "LOGSIGHT_SERVER")]
    server: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "LOGSIGHT_CONFIG")]
    config: Option<PathBuf>,

    /// Output format [default: table]
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and classify a log file locally
    Parse {
        /// Log file
        file: PathBuf,

        /// Show aggregate counters instead of entries
        #[arg(long)]
        metrics: bool,
    },

    /// Upload a log file to the server
    Upload {
        /// Log file
        file: PathBuf,
    },

    /// Upload a log file and show narrative insights
    Insights {
        /// Log file
        file: PathBuf,
    },

    /// Show aggregate metrics from the server
    Metrics,

    /// Ask a question about everything uploaded so far
    Ask {
        /// The question
        question: String,

        /// Number of log documents to retrieve as context
        #[arg(short, long)]
        k: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_default(),
    };
    let merged = config.merge_with_args(cli.server.as_deref(), cli.output, cli.no_color);
    let ctx = OutputContext::new(merged.output, merged.no_color, cli.quiet);

    match &cli.command {
        Commands::Parse { file, metrics } => {
            commands::parse(file, *metrics, &ctx).await?;
        }

        Commands::Upload { file } => {
            let client = create_client(&merged.server)?;
            commands::upload(&client, file, &ctx).await?;
        }

        Commands::Insights { file } => {
            let client = create_client(&merged.server)?;
            commands::insights(&client, file, &ctx).await?;
        }

        Commands::Metrics => {
            let client = create_client(&merged.server)?;
            commands::metrics(&client, &ctx).await?;
        }

        Commands::Ask { question, k } => {
            let client = create_client(&merged.server)?;
            commands::ask(&client, question, *k, &ctx).await?;
        }
    }

    Ok(())
}

fn create_client(server: &str) -> Result<LogsightClient> {
    LogsightClient::new(server).with_context(|| format!("Invalid server URL: {}", server))
}
