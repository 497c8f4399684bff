//! logsight-core - Log ingestion, classification and metrics aggregation
//!
//! This crate turns raw, human-written log files into structured entries and
//! keeps the process-wide aggregate metrics derived from them.
//!
//! # Pipeline
//!
//! ```text
//! bytes ─▶ LineReader ─▶ parse_line ─▶ Severity::classify ─▶ MetricsAggregator
//!                                              │
//!                                              └─▶ Vec<LogEntry> (returned to caller)
//! ```
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use logsight_core::{Ingestor, MetricsAggregator, Severity};
//!
//! # tokio_test::block_on(async {
//! let aggregator = Arc::new(MetricsAggregator::new());
//! let ingestor = Ingestor::new(aggregator.clone());
//!
//! let input = b"[2025-08-03 12:45:12] INFO: User logged in\n";
//! let report = ingestor.ingest(&input[..]).await.unwrap();
//!
//! assert_eq!(report.entries.len(), 1);
//! assert_eq!(report.entries[0].severity, Severity::Success);
//! assert_eq!(aggregator.snapshot().total(), 1);
//! # });
//! ```

pub mod aggregator;
pub mod classifier;
pub mod corpus;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod lines;
pub mod models;
pub mod parser;

pub use aggregator::{MetricsAggregator, DEFAULT_TOP_IPS};
pub use corpus::{format_context, CorpusConfig, CorpusDocument, CorpusStore, NO_MATCHING_LOGS};
pub use error::{CoreError, CoreResult};
pub use ingest::{IngestReport, Ingestor, PendingIngest};
pub use lines::{LineReader, LogLine};
pub use models::*;
pub use parser::{parse_line, ParsedLine};
