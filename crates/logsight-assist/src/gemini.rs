//! Gemini `generateContent` backend

use std::time::Duration;

use async_trait::async_trait;
use logsight_core::{AssistAnswer, CorpusDocument, InsightReport, LogEntry};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use url::Url;

use crate::assistant::Assistant;
use crate::decode;
use crate::error::{AssistError, AssistResult};
use crate::prompt;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const TEMPERATURE: f64 = 0.2;

/// HTTP adapter for Google's Gemini API
#[derive(Debug, Clone)]
pub struct GeminiAssistant {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl GeminiAssistant {
    /// Client against the public endpoint with default timeout
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> AssistResult<Self> {
        Self::with_config(DEFAULT_BASE_URL, api_key, model, DEFAULT_TIMEOUT)
    }

    /// Client against `base_url` (tests point this at a local stub)
    pub fn with_config(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> AssistResult<Self> {
        let model = model.into();
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = Url::parse(base_url)?
            .join(&format!("/v1beta/models/{}:generateContent", model))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One-shot generation; returns the first candidate's text
    #[instrument(
        skip(self, system, prompt),
        fields(model = %self.model, prompt_chars = prompt.len())
    )]
    async fn generate(&self, system: &str, prompt: &str) -> AssistResult<String> {
        let body = json!({
            "systemInstruction": { "parts": [{ "text": system }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "responseMimeType": "application/json",
            },
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(AssistError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response.json().await?;
        let text = candidate_text(&payload).ok_or(AssistError::EmptyResponse)?;
        debug!(chars = text.len(), "Received collaborator text");
        Ok(text)
    }
}

/// `candidates[0].content.parts[*].text`, concatenated
fn candidate_text(payload: &Value) -> Option<String> {
    let parts = payload["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

#[async_trait]
impl Assistant for GeminiAssistant {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn answer(
        &self,
        question: &str,
        context: &[CorpusDocument],
    ) -> AssistResult<AssistAnswer> {
        let text = self
            .generate(prompt::ANSWER_SYSTEM, &prompt::answer_prompt(question, context))
            .await?;
        Ok(decode::decode_answer(&text))
    }

    async fn insights(&self, entries: &[LogEntry]) -> AssistResult<InsightReport> {
        let text = self
            .generate(prompt::INSIGHTS_SYSTEM, &prompt::insights_prompt(entries))
            .await?;
        Ok(decode::decode_insights(&text))
    }
}
