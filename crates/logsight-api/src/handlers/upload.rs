//! Upload handlers
//!
//! Request bodies are streamed straight into the ingestor; nothing buffers
//! the whole file. Every accepted upload is also indexed into the retrieval
//! corpus.

use std::io;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::TryStreamExt;
use logsight_core::{IngestReport, InsightReport, InsightsResponse, UploadedEntry};
use tokio_util::io::StreamReader;

use crate::error::{is_length_limit, ApiError};
use crate::state::AppState;

/// Set on responses whose input stream failed part-way
pub const TRUNCATED_HEADER: &str = "x-logsight-truncated";

/// POST /upload
/// Parse a raw log file; respond with the classified entries
pub async fn upload(State(state): State<AppState>, body: Body) -> Result<Response, ApiError> {
    let report = ingest_body(&state, body).await?;
    let indexed = state.corpus().index(&report.entries);
    let truncated = report.is_truncated();

    tracing::info!(
        entries = report.entries.len(),
        discarded = report.discarded,
        indexed,
        "Log file uploaded"
    );

    let entries: Vec<UploadedEntry> = report.entries.into_iter().map(UploadedEntry::from).collect();
    Ok(with_truncation(Json(entries), truncated))
}

/// POST /insights
/// Parse a raw log file and ask the assistant for narrative insights
pub async fn insights(State(state): State<AppState>, body: Body) -> Result<Response, ApiError> {
    let report = ingest_body(&state, body).await?;
    let indexed_chunks = state.corpus().index(&report.entries);
    let truncated = report.is_truncated();

    let insights = match state.assistant().insights(&report.entries).await {
        Ok(insights) => insights,
        Err(e) => {
            tracing::warn!(
                assistant = state.assistant().name(),
                error = %e,
                "Insights unavailable, returning entries only"
            );
            InsightReport::default()
        }
    };

    tracing::info!(
        entries = report.entries.len(),
        indexed_chunks,
        has_insights = !insights.is_empty(),
        "Log file analyzed"
    );

    let response = InsightsResponse {
        entries: report.entries.into_iter().map(UploadedEntry::from).collect(),
        insights,
        indexed_chunks,
    };
    Ok(with_truncation(Json(response), truncated))
}

/// Parse the whole body, then record it. An oversized body is rejected with
/// nothing recorded.
async fn ingest_body(state: &AppState, body: Body) -> Result<IngestReport, ApiError> {
    let stream = body.into_data_stream().map_err(io::Error::other);
    let pending = state.ingestor().parse(StreamReader::new(stream)).await?;

    if pending.failure().is_some_and(is_length_limit) {
        tracing::debug!(
            parsed = pending.report().entries.len(),
            "Discarding oversized upload"
        );
        return Err(ApiError::PayloadTooLarge(format!(
            "Upload exceeds {} bytes",
            state.max_upload_bytes()
        )));
    }
    Ok(state.ingestor().commit(pending))
}

fn with_truncation(body: impl IntoResponse, truncated: bool) -> Response {
    let mut response = body.into_response();
    if truncated {
        response
            .headers_mut()
            .insert(HeaderName::from_static(TRUNCATED_HEADER), HeaderValue::from_static("true"));
    }
    response
}
