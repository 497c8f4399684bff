//! logsight-api - Logsight HTTP API layer
//!
//! Routes:
//!
//! | Method | Path       | Body            | Response                                  |
//! |--------|------------|-----------------|-------------------------------------------|
//! | GET    | `/health`  |                 | `OK`                                      |
//! | POST   | `/upload`  | raw log bytes   | `[{timestamp, level, originalLevel, message}]` |
//! | POST   | `/insights`| raw log bytes   | `{entries, insights, indexed_chunks}`     |
//! | GET    | `/metrics` |                 | `{requests_per_minute, error_codes, ...}` |
//! | POST   | `/query`   | `{question, k?}`| `{question, summary?, ..., context_size}` |
//!
//! # Usage
//!
//! ```ignore
//! use logsight_api::{create_router, AppState};
//!
//! let state = AppState::new(aggregator, corpus, assistant);
//! let router = create_router(state);
//! axum::serve(listener, router).await?;
//! ```

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use handlers::upload::TRUNCATED_HEADER;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Create the Logsight API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/upload", post(handlers::upload::upload))
        .route("/insights", post(handlers::upload::insights))
        .route("/metrics", get(handlers::metrics::get_metrics))
        .route("/query", post(handlers::query::query))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(state.max_upload_bytes()))
                .layer(cors),
        )
        .with_state(state)
}
