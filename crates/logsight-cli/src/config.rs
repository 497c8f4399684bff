//! Configuration file handling for the logsight CLI

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

pub const DEFAULT_SERVER: &str = "http://localhost:5000";

/// Values read from `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default server URL
    pub server: Option<String>,
    /// Default output format
    pub output: Option<OutputFormat>,
    /// Disable colored output
    pub no_color: Option<bool>,
}

impl Config {
    /// Load the per-user config file, if there is one
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// `<config dir>/logsight/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("logsight");
        Ok(dir.join("config.toml"))
    }

    /// Flags win over the file, the file wins over built-in defaults
    pub fn merge_with_args(
        &self,
        server: Option<&str>,
        output: Option<OutputFormat>,
        no_color: bool,
    ) -> MergedConfig {
        MergedConfig {
            server: server
                .map(String::from)
                .or_else(|| self.server.clone())
                .unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            output: output.or(self.output).unwrap_or_default(),
            no_color: no_color || self.no_color.unwrap_or(false),
        }
    }
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub server: String,
    pub output: OutputFormat,
    pub no_color: bool,
}
