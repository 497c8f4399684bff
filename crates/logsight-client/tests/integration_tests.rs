//! Integration tests for logsight-client
//!
//! These tests spin up a real Logsight server and use the client to interact
//! with it, keeping the client in sync with the API.

use std::sync::Arc;

use async_trait::async_trait;
use logsight_api::{create_router, AppState};
use logsight_assist::{AssistError, AssistResult, Assistant, LocalAssistant};
use logsight_client::testing::TestServer;
use logsight_client::{LogsightClientError, Severity};
use logsight_core::{
    AssistAnswer, CorpusDocument, CorpusStore, InsightReport, LogEntry, MetricsAggregator,
};
use pretty_assertions::assert_eq;

// =============================================================================
// Stub Assistants
// =============================================================================

/// Echoes what it was given so tests can see the context
struct EchoAssistant;

#[async_trait]
impl Assistant for EchoAssistant {
    fn name(&self) -> &str {
        "echo"
    }

    async fn answer(
        &self,
        question: &str,
        context: &[CorpusDocument],
    ) -> AssistResult<AssistAnswer> {
        Ok(AssistAnswer {
            summary: Some(format!("{} ({} docs)", question, context.len())),
            severity: Some("ERROR".to_string()),
            findings: Some(context.iter().map(|d| d.content.clone()).collect()),
            recommendations: None,
            citations: None,
        })
    }

    async fn insights(&self, entries: &[LogEntry]) -> AssistResult<InsightReport> {
        Ok(InsightReport {
            summary: Some(format!("{} entries", entries.len())),
            ..Default::default()
        })
    }
}

/// Never reachable
struct DownAssistant;

#[async_trait]
impl Assistant for DownAssistant {
    fn name(&self) -> &str {
        "down"
    }

    async fn answer(
        &self,
        _question: &str,
        _context: &[CorpusDocument],
    ) -> AssistResult<AssistAnswer> {
        Err(AssistError::EmptyResponse)
    }

    async fn insights(&self, _entries: &[LogEntry]) -> AssistResult<InsightReport> {
        Err(AssistError::Status {
            status: 503,
            message: "unavailable".to_string(),
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

const SAMPLE: &str = "\
[2025-08-03 12:45:12] INFO: User logged in from 10.0.0.5
[2025-08-03 12:46:00] ERROR: Payment failed, unauthorized access denied HTTP 401 from 10.0.0.9
not a log line
[2025-08-03 12:46:30] DEBUG: Slow response from upstream HTTP 504
";

async fn server_with(assistant: Arc<dyn Assistant>) -> TestServer {
    let state = AppState::new(
        Arc::new(MetricsAggregator::new()),
        Arc::new(CorpusStore::default()),
        assistant,
    );
    TestServer::start(create_router(state)).await.unwrap()
}

async fn local_server() -> TestServer {
    server_with(Arc::new(LocalAssistant::new())).await
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let server = local_server().await;
    assert_eq!(server.client.health().await.unwrap(), "OK");
}

// =============================================================================
// Upload and Metrics
// =============================================================================

#[tokio::test]
async fn test_upload_returns_classified_entries() {
    let server = local_server().await;
    let entries = server.client.upload(SAMPLE).await.unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].level, Severity::Success);
    assert_eq!(entries[0].original_level, "INFO");
    assert_eq!(entries[1].level, Severity::Error);
    assert_eq!(entries[2].level, Severity::Warning);
    assert_eq!(entries[2].original_level, "DEBUG");
}

#[tokio::test]
async fn test_metrics_reflect_uploads() {
    let server = local_server().await;
    assert_eq!(server.client.metrics().await.unwrap().total(), 0);

    server.client.upload(SAMPLE).await.unwrap();
    let metrics = server.client.metrics().await.unwrap();

    assert_eq!(metrics.total(), 3);
    assert_eq!(metrics.level(Severity::Error), 1);
    assert_eq!(metrics.requests_per_minute["2025-08-03 12:46"], 2);
    assert_eq!(metrics.error_codes["401"], 1);
    assert_eq!(metrics.error_codes["504"], 1);
    assert_eq!(metrics.top_ips["10.0.0.5"], 1);
    assert_eq!(metrics.top_ips["10.0.0.9"], 1);
}

#[tokio::test]
async fn test_upload_file_streams_from_disk() {
    let server = local_server().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    std::fs::write(&path, SAMPLE.repeat(200)).unwrap();

    let entries = server.client.upload_file(&path).await.unwrap();
    assert_eq!(entries.len(), 600);
    assert_eq!(server.client.metrics().await.unwrap().total(), 600);
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let server = local_server().await;
    let result = server.client.upload_file("/definitely/not/here.log").await;
    assert!(matches!(result, Err(LogsightClientError::IoError(_))));
}

#[tokio::test]
async fn test_empty_upload() {
    let server = local_server().await;
    let entries = server.client.upload("").await.unwrap();
    assert!(entries.is_empty());
}

// =============================================================================
// Insights
// =============================================================================

#[tokio::test]
async fn test_insights_with_local_assistant() {
    let server = local_server().await;
    let response = server.client.insights(SAMPLE).await.unwrap();

    assert_eq!(response.entries.len(), 3);
    assert_eq!(response.indexed_chunks, 3);
    assert_eq!(
        response.insights.summary.as_deref(),
        Some("Parsed 3 entries; 1 errors, 1 warnings.")
    );
    assert_eq!(response.insights.threat_level.as_deref(), Some("Medium"));
}

#[tokio::test]
async fn test_insights_survive_assistant_failure() {
    let server = server_with(Arc::new(DownAssistant)).await;
    let response = server.client.insights(SAMPLE).await.unwrap();

    assert_eq!(response.entries.len(), 3);
    assert!(response.insights.is_empty());
}

// =============================================================================
// Query
// =============================================================================

#[tokio::test]
async fn test_query_passes_retrieved_context() {
    let server = server_with(Arc::new(EchoAssistant)).await;
    server.client.upload(SAMPLE).await.unwrap();

    let response = server.client.query("payment failed?", None).await.unwrap();
    assert_eq!(response.question, "payment failed?");
    assert_eq!(response.context_size, 1);
    assert_eq!(response.answer.summary.as_deref(), Some("payment failed? (1 docs)"));
    // Missing citations are filled from the context
    let citations = response.answer.citations.unwrap();
    assert_eq!(citations.len(), 1);
    assert!(citations[0].starts_with("Payment failed"));
}

#[tokio::test]
async fn test_query_respects_k() {
    let server = server_with(Arc::new(EchoAssistant)).await;
    server.client.upload(SAMPLE).await.unwrap();

    let response = server.client.query("from", Some(1)).await.unwrap();
    assert_eq!(response.context_size, 1);
}

#[tokio::test]
async fn test_query_degrades_to_citations() {
    let server = server_with(Arc::new(DownAssistant)).await;
    server.client.upload(SAMPLE).await.unwrap();

    let response = server.client.query("slow upstream", None).await.unwrap();
    assert_eq!(response.answer.summary, None);
    assert_eq!(
        response.answer.citations,
        Some(vec!["Slow response from upstream HTTP 504".to_string()])
    );
}

#[tokio::test]
async fn test_query_blank_question_rejected() {
    let server = local_server().await;
    let result = server.client.query("   ", None).await;
    match result {
        Err(LogsightClientError::BadRequest(message)) => {
            assert_eq!(message, "No question provided")
        }
        other => panic!("expected bad request, got {:?}", other),
    }
}
