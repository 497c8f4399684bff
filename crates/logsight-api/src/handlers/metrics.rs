//! Aggregate metrics handler

use axum::extract::State;
use axum::Json;
use logsight_core::MetricsSnapshot;

use crate::state::AppState;

/// GET /metrics
/// Snapshot of everything recorded since startup
pub async fn get_metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.aggregator().snapshot())
}
