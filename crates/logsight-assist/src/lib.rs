//! logsight-assist - External AI collaborator adapter
//!
//! Narrative summaries and question answering are delegated to a language
//! model service. This crate owns the contract with that service, not its
//! reasoning:
//!
//! - [`Assistant`]: the trait the HTTP layer talks to
//! - [`GeminiAssistant`]: `POST {base}/v1beta/models/{model}:generateContent`
//! - [`LocalAssistant`]: count-based payloads when no credentials are set
//! - [`decode`]: tolerant parsing of model output into partial payloads
//!
//! # Example
//!
//! ```rust
//! use logsight_assist::{AssistantConfig, Assistant};
//! use logsight_core::LogEntry;
//!
//! # tokio_test::block_on(async {
//! let assistant = AssistantConfig::default().build_or_local();
//! let entries = vec![LogEntry::new("t", "ERROR", "Payment failed")];
//! let report = assistant.insights(&entries).await.unwrap();
//! assert_eq!(report.threat_level.as_deref(), Some("Medium"));
//! # });
//! ```

pub mod assistant;
pub mod config;
pub mod decode;
pub mod error;
pub mod gemini;
pub mod local;
pub mod prompt;

pub use assistant::Assistant;
pub use config::{AssistantConfig, DEFAULT_API_KEY_ENV};
pub use error::{AssistError, AssistResult};
pub use gemini::GeminiAssistant;
pub use local::{fallback_citations, LocalAssistant};
