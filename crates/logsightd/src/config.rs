//! Daemon configuration
//!
//! An optional TOML file provides the baseline; command-line flags override
//! individual values. Every section and field may be omitted.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 5000
//! max_upload_bytes = 67108864
//!
//! [metrics]
//! top_ips = 10
//!
//! [corpus]
//! max_documents = 50000
//! chunk_size = 600
//! chunk_overlap = 60
//! context_entries = 8
//!
//! [assistant]
//! provider = "gemini"
//! model = "gemini-2.5-flash"
//! api_key_env = "GEMINI_API_KEY"
//! timeout_secs = 60
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use logsight_api::state::{DEFAULT_CONTEXT_ENTRIES, DEFAULT_MAX_UPLOAD_BYTES};
use logsight_assist::AssistantConfig;
use logsight_core::{CorpusConfig, DEFAULT_TOP_IPS};
use serde::{Deserialize, Serialize};

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "logsightd")]
#[command(author, version, about = "Log ingestion, metrics and question answering server")]
pub struct Args {
    /// Config file (TOML)
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "LOGSIGHT_BIND")]
    pub bind: Option<IpAddr>,

    /// Port to listen on
    #[arg(short, long, env = "LOGSIGHT_PORT")]
    pub port: Option<u16>,

    /// Maximum upload size in bytes
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Source addresses reported by /metrics
    #[arg(long)]
    pub top_ips: Option<usize>,

    /// Assistant provider (local, gemini)
    #[arg(long, env = "LOGSIGHT_ASSISTANT")]
    pub provider: Option<String>,

    /// Assistant model name
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::from([0, 0, 0, 0]),
            port: 5000,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub top_ips: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            top_ips: DEFAULT_TOP_IPS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSection {
    #[serde(flatten)]
    pub store: CorpusConfig,
    /// Documents retrieved per question by default
    pub context_entries: usize,
}

impl Default for CorpusSection {
    fn default() -> Self {
        Self {
            store: CorpusConfig::default(),
            context_entries: DEFAULT_CONTEXT_ENTRIES,
        }
    }
}

/// Whole daemon configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub server: ServerConfig,
    pub metrics: MetricsConfig,
    pub corpus: CorpusSection,
    pub assistant: AssistantConfig,
}

impl DaemonConfig {
    /// Parse a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// File named by `args` (or defaults) with flag overrides applied
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(args);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, args: &Args) {
        if let Some(bind) = args.bind {
            self.server.bind = bind;
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(bytes) = args.max_upload_bytes {
            self.server.max_upload_bytes = bytes;
        }
        if let Some(top_ips) = args.top_ips {
            self.metrics.top_ips = top_ips;
        }
        if let Some(provider) = &args.provider {
            self.assistant.provider = provider.clone();
        }
        if let Some(model) = &args.model {
            self.assistant.model = model.clone();
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.bind, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_is_default() {
        let config: DaemonConfig = toml::from_str("").unwrap();
        assert_eq!(config, DaemonConfig::default());
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn test_partial_sections() {
        let config: DaemonConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [corpus]
            chunk_size = 300
            context_entries = 4

            [assistant]
            provider = "gemini"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.corpus.store.chunk_size, 300);
        assert_eq!(config.corpus.store.chunk_overlap, 60);
        assert_eq!(config.corpus.context_entries, 4);
        assert_eq!(config.metrics.top_ips, DEFAULT_TOP_IPS);
        assert_eq!(config.assistant.provider, "gemini");
        assert_eq!(config.assistant.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logsightd.toml");
        std::fs::write(&path, "[server]\nport = 7000\nbind = \"127.0.0.1\"\n").unwrap();

        let args = Args {
            config: Some(path),
            port: Some(9000),
            top_ips: Some(3),
            ..Default::default()
        };
        let config = DaemonConfig::from_args(&args).unwrap();

        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.metrics.top_ips, 3);
    }

    #[test]
    fn test_missing_file_is_error() {
        let args = Args {
            config: Some(PathBuf::from("/nonexistent/logsightd.toml")),
            ..Default::default()
        };
        assert!(DaemonConfig::from_args(&args).is_err());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        assert!(DaemonConfig::load(&path).is_err());
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = Args::parse_from([
            "logsightd",
            "conf.toml",
            "--port",
            "6000",
            "--provider",
            "local",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("conf.toml")));
        assert_eq!(args.port, Some(6000));
        assert_eq!(args.provider.as_deref(), Some("local"));
    }
}
