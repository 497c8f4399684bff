//! End-to-end tests for the Logsight server
//!
//! Every test starts its own in-process server on an ephemeral port, so the
//! suite runs in parallel without shared state:
//!
//! ```bash
//! cargo test -p logsight-tests
//! ```
//!
//! # Test Structure
//!
//! - `scenarios_e2e_test.rs` - Parsing and aggregation scenarios over HTTP
//! - `concurrency_test.rs` - Parallel uploads against one aggregator
//! - `limits_test.rs` - Body limits, malformed requests, truncation
//! - `assistant_e2e_test.rs` - Insights and questions with stub assistants

use std::sync::Arc;

use logsight_api::{create_router, AppState};
use logsight_assist::{Assistant, LocalAssistant};
use logsight_client::testing::TestServer;
use logsight_core::{CorpusStore, MetricsAggregator};

pub const SCENARIO_A: &str = "[2025-08-03 12:45:12] INFO: User logged in\n";
pub const SCENARIO_B: &str =
    "[2025-08-03 12:46:00] ERROR: Payment failed, unauthorized access denied\n";
pub const SCENARIO_C: &str = "\
[2025-08-03 12:45:12] INFO: User logged in\n\
\n\
[2025-08-03 12:46:00] ERROR: Payment failed, unauthorized access denied\n";
pub const SCENARIO_D: &str = "garbage no brackets here\n";

/// Server with a fresh aggregator, an empty corpus and the given assistant
pub async fn start_server(
    assistant: Arc<dyn Assistant>,
    max_upload_bytes: Option<usize>,
) -> TestServer {
    let mut state = AppState::new(
        Arc::new(MetricsAggregator::new()),
        Arc::new(CorpusStore::default()),
        assistant,
    );
    if let Some(bytes) = max_upload_bytes {
        state = state.with_max_upload_bytes(bytes);
    }
    match TestServer::start(create_router(state)).await {
        Ok(server) => server,
        Err(e) => panic!("failed to start test server: {}", e),
    }
}

/// Server backed by the credential-less assistant
pub async fn local_server() -> TestServer {
    start_server(Arc::new(LocalAssistant::new()), None).await
}
