//! Provider selection

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::assistant::Assistant;
use crate::error::{AssistError, AssistResult};
use crate::gemini::{self, GeminiAssistant};
use crate::local::LocalAssistant;

/// Environment variable checked for the Gemini key when none is configured
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// `[assistant]` section of the daemon config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// `local` or `gemini`
    pub provider: String,
    pub model: String,
    pub base_url: String,
    /// Inline key; prefer `api_key_env`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            provider: "local".to_string(),
            model: gemini::DEFAULT_MODEL.to_string(),
            base_url: gemini::DEFAULT_BASE_URL.to_string(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: gemini::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl AssistantConfig {
    /// Configured key, else the one in `api_key_env`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Build the configured provider exactly, failing on a missing key
    pub fn build(&self) -> AssistResult<Arc<dyn Assistant>> {
        match self.provider.to_ascii_lowercase().as_str() {
            "local" => Ok(Arc::new(LocalAssistant::new())),
            "gemini" => {
                let key = self
                    .resolve_api_key()
                    .ok_or_else(|| AssistError::MissingApiKey(self.api_key_env.clone()))?;
                Ok(Arc::new(GeminiAssistant::with_config(
                    &self.base_url,
                    key,
                    &self.model,
                    Duration::from_secs(self.timeout_secs),
                )?))
            }
            other => Err(AssistError::UnknownProvider(other.to_string())),
        }
    }

    /// Build the configured provider, degrading to the local assistant when
    /// it cannot be constructed
    pub fn build_or_local(&self) -> Arc<dyn Assistant> {
        match self.build() {
            Ok(assistant) => assistant,
            Err(e) => {
                tracing::warn!(
                    provider = %self.provider,
                    error = %e,
                    "Assistant unavailable, using local summaries"
                );
                Arc::new(LocalAssistant::new())
            }
        }
    }
}
