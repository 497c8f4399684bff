//! Question answering over the retrieval corpus

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use logsight_assist::fallback_citations;
use logsight_core::{AssistAnswer, QueryRequest, QueryResponse};

use crate::error::ApiError;
use crate::state::{AppState, MAX_CONTEXT_ENTRIES};

/// POST /query
/// Retrieve matching documents and ask the assistant about them
pub async fn query(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<QueryResponse>, ApiError> {
    let request: QueryRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid query body: {}", e)))?;

    let question = request
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No question provided".to_string()))?
        .to_string();

    let k = request
        .k
        .unwrap_or(state.context_entries())
        .min(MAX_CONTEXT_ENTRIES);
    let context = state.corpus().search(&question, k);

    let answer = match state.assistant().answer(&question, &context).await {
        Ok(mut answer) => {
            if answer.citations.as_ref().map_or(true, Vec::is_empty) && !context.is_empty() {
                answer.citations = Some(fallback_citations(&context));
            }
            answer
        }
        Err(e) => {
            tracing::warn!(
                assistant = state.assistant().name(),
                error = %e,
                "Answer unavailable, returning raw evidence"
            );
            AssistAnswer {
                citations: (!context.is_empty()).then(|| fallback_citations(&context)),
                ..Default::default()
            }
        }
    };

    tracing::info!(k, context_size = context.len(), "Question answered");

    Ok(Json(QueryResponse {
        question,
        answer,
        context_size: context.len(),
    }))
}
