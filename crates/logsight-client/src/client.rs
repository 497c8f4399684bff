//! Logsight HTTP Client implementation

use std::path::Path;
use std::time::Duration;

use logsight_core::{InsightsResponse, MetricsSnapshot, QueryRequest, QueryResponse, UploadedEntry};
use reqwest::{Body, Client, StatusCode};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{LogsightClientError, Result};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Response header set when the server kept a partial parse
const TRUNCATED_HEADER: &str = "x-logsight-truncated";

/// Error body returned by the server
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

/// Logsight REST API client
#[derive(Debug, Clone)]
pub struct LogsightClient {
    client: Client,
    base_url: Url,
}

impl LogsightClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the server (e.g., "http://localhost:5000")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new client with custom timeouts
    pub fn with_config(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        let base_url = Url::parse(base_url)?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Health Check
    // =========================================================================

    /// Check server health
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<String> {
        let url = self.base_url.join("/health")?;
        let response = self.client.get(url).send().await?;

        if response.status().is_success() {
            Ok(response.text().await?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    // =========================================================================
    // Uploads
    // =========================================================================

    /// Upload raw log content
    #[instrument(skip(self, body))]
    pub async fn upload(&self, body: impl Into<Body>) -> Result<Vec<UploadedEntry>> {
        let url = self.base_url.join("/upload")?;
        let response = self.client.post(url).body(body).send().await?;
        self.handle_response(response).await
    }

    /// Stream a log file to the server without reading it into memory
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<Vec<UploadedEntry>> {
        let body = file_body(path.as_ref()).await?;
        self.upload(body).await
    }

    /// Upload raw log content and request narrative insights
    #[instrument(skip(self, body))]
    pub async fn insights(&self, body: impl Into<Body>) -> Result<InsightsResponse> {
        let url = self.base_url.join("/insights")?;
        let response = self.client.post(url).body(body).send().await?;
        self.handle_response(response).await
    }

    /// Stream a log file to the insights endpoint
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn insights_file(&self, path: impl AsRef<Path>) -> Result<InsightsResponse> {
        let body = file_body(path.as_ref()).await?;
        self.insights(body).await
    }

    // =========================================================================
    // Metrics and Questions
    // =========================================================================

    /// Current aggregate metrics
    #[instrument(skip(self))]
    pub async fn metrics(&self) -> Result<MetricsSnapshot> {
        let url = self.base_url.join("/metrics")?;
        debug!("Fetching metrics from {}", url);

        let response = self.client.get(url).send().await?;
        self.handle_response(response).await
    }

    /// Ask a question against everything uploaded so far
    #[instrument(skip(self))]
    pub async fn query(&self, question: &str, k: Option<usize>) -> Result<QueryResponse> {
        let url = self.base_url.join("/query")?;
        let request = QueryRequest {
            question: Some(question.to_string()),
            k,
        };

        let response = self.client.post(url).json(&request).send().await?;
        self.handle_response(response).await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            if response.headers().contains_key(TRUNCATED_HEADER) {
                warn!("Server reported a truncated upload; results are partial");
            }
            response
                .json()
                .await
                .map_err(|e| LogsightClientError::ParseError(e.to_string()))
        } else {
            Err(self.extract_error_from_status(response, status).await)
        }
    }

    /// Extract error from failed response
    async fn extract_error(&self, response: reqwest::Response) -> LogsightClientError {
        let status = response.status();
        self.extract_error_from_status(response, status).await
    }

    async fn extract_error_from_status(
        &self,
        response: reqwest::Response,
        status: StatusCode,
    ) -> LogsightClientError {
        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(err) if !err.message.is_empty() => err.message,
            Ok(err) if !err.error.is_empty() => err.error,
            _ if !text.trim().is_empty() => text.trim().to_string(),
            _ => format!("HTTP {}", status),
        };

        match status {
            StatusCode::BAD_REQUEST => LogsightClientError::BadRequest(message),
            StatusCode::PAYLOAD_TOO_LARGE => LogsightClientError::PayloadTooLarge(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                LogsightClientError::Timeout
            }
            _ => LogsightClientError::server_error(status.as_u16(), message),
        }
    }
}

async fn file_body(path: &Path) -> Result<Body> {
    let file = tokio::fs::File::open(path).await?;
    Ok(Body::wrap_stream(ReaderStream::new(file)))
}
