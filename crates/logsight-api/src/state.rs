//! Application state for the Logsight API

use std::sync::Arc;

use logsight_assist::{Assistant, LocalAssistant};
use logsight_core::{CorpusStore, Ingestor, MetricsAggregator};

/// Context documents retrieved per question unless the request says otherwise
pub const DEFAULT_CONTEXT_ENTRIES: usize = 8;
/// Upper bound on a request's `k`
pub const MAX_CONTEXT_ENTRIES: usize = 100;
/// Default request body limit for uploads
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    ingestor: Ingestor,
    corpus: Arc<CorpusStore>,
    assistant: Arc<dyn Assistant>,
    context_entries: usize,
    max_upload_bytes: usize,
}

impl AppState {
    /// State around an existing aggregator and corpus
    pub fn new(
        aggregator: Arc<MetricsAggregator>,
        corpus: Arc<CorpusStore>,
        assistant: Arc<dyn Assistant>,
    ) -> Self {
        Self {
            ingestor: Ingestor::new(aggregator),
            corpus,
            assistant,
            context_entries: DEFAULT_CONTEXT_ENTRIES,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Fresh aggregator and corpus with the local assistant
    pub fn local() -> Self {
        Self::new(
            Arc::new(MetricsAggregator::new()),
            Arc::new(CorpusStore::default()),
            Arc::new(LocalAssistant::new()),
        )
    }

    pub fn with_context_entries(mut self, k: usize) -> Self {
        self.context_entries = k.clamp(1, MAX_CONTEXT_ENTRIES);
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn ingestor(&self) -> &Ingestor {
        &self.ingestor
    }

    pub fn aggregator(&self) -> &Arc<MetricsAggregator> {
        self.ingestor.aggregator()
    }

    pub fn corpus(&self) -> &Arc<CorpusStore> {
        &self.corpus
    }

    pub fn assistant(&self) -> &Arc<dyn Assistant> {
        &self.assistant
    }

    pub fn context_entries(&self) -> usize {
        self.context_entries
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}
