//! Logsight Client Library
//!
//! Typed HTTP client for a running `logsightd`.
//!
//! # Example
//!
//! ```rust,no_run
//! use logsight_client::LogsightClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = LogsightClient::new("http://localhost:5000")?;
//!
//! let entries = client.upload_file("app.log").await?;
//! println!("{} entries", entries.len());
//!
//! let metrics = client.metrics().await?;
//! println!("{} recorded in total", metrics.total());
//!
//! let answer = client.query("Why did payments fail?", None).await?;
//! println!("{:?}", answer.answer.summary);
//! # Ok(())
//! # }
//! ```
//!
//! # Testing
//!
//! The `testing` module runs a router on an ephemeral port:
//!
//! ```rust,ignore
//! use logsight_client::testing::TestServer;
//! use logsight_api::{create_router, AppState};
//!
//! let server = TestServer::start(create_router(AppState::local())).await?;
//! let metrics = server.client.metrics().await?;
//! ```

pub mod client;
pub mod error;
pub mod testing;

pub use client::LogsightClient;
pub use error::{LogsightClientError, Result};
pub use logsight_core::{
    AssistAnswer, InsightReport, InsightsResponse, MetricsSnapshot, QueryResponse, Section,
    SectionBody, Severity, UploadedEntry,
};
