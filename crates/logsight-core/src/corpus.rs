//! Retrieval corpus
//!
//! Parsed entries are packaged as documents for question answering: one
//! document per entry (long messages are split into overlapping chunks), each
//! with a content-derived id so indexing the same upload twice replaces
//! documents instead of duplicating them.
//!
//! Retrieval is lexical. A document scores one point per distinct question
//! term it contains; ties go to the most recently indexed document.

use std::collections::{BTreeMap, HashMap, HashSet};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::{LogEntry, Severity};

/// Rendered in place of an empty context
pub const NO_MATCHING_LOGS: &str = "NO MATCHING LOGS";

/// Corpus sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Oldest documents are evicted past this count
    pub max_documents: usize,
    /// Maximum characters per document
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks of one message
    pub chunk_overlap: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            max_documents: 50_000,
            chunk_size: 600,
            chunk_overlap: 60,
        }
    }
}

/// One retrievable chunk of an entry's message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusDocument {
    /// Hex SHA-256 over content and metadata
    pub id: String,
    pub content: String,
    pub timestamp: String,
    pub level: Severity,
    pub declared_level: String,
    /// Position of the source entry within its upload
    pub ordinal: usize,
}

#[derive(Debug, Default)]
struct Documents {
    next_seq: u64,
    by_seq: BTreeMap<u64, CorpusDocument>,
    seq_by_id: HashMap<String, u64>,
}

impl Documents {
    fn upsert(&mut self, doc: CorpusDocument) {
        if let Some(old) = self.seq_by_id.remove(&doc.id) {
            self.by_seq.remove(&old);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.seq_by_id.insert(doc.id.clone(), seq);
        self.by_seq.insert(seq, doc);
    }

    fn evict_to(&mut self, capacity: usize) -> usize {
        let mut evicted = 0;
        while self.by_seq.len() > capacity {
            match self.by_seq.pop_first() {
                Some((_, doc)) => {
                    self.seq_by_id.remove(&doc.id);
                    evicted += 1;
                }
                None => break,
            }
        }
        evicted
    }
}

/// Shared, capacity-bounded document store
#[derive(Debug, Default)]
pub struct CorpusStore {
    config: CorpusConfig,
    documents: RwLock<Documents>,
}

impl CorpusStore {
    pub fn new(config: CorpusConfig) -> Self {
        Self {
            config,
            documents: RwLock::new(Documents::default()),
        }
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// Documents currently held
    pub fn len(&self) -> usize {
        self.documents.read().by_seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Package and upsert `entries`; returns the number of documents written
    pub fn index(&self, entries: &[LogEntry]) -> usize {
        let docs: Vec<CorpusDocument> = entries
            .iter()
            .enumerate()
            .flat_map(|(ordinal, entry)| self.documents_for(ordinal, entry))
            .collect();
        let written = docs.len();

        let evicted = {
            let mut documents = self.documents.write();
            for doc in docs {
                documents.upsert(doc);
            }
            documents.evict_to(self.config.max_documents)
        };

        debug!(
            entries = entries.len(),
            written,
            evicted,
            "Indexed entries into corpus"
        );
        written
    }

    /// Up to `k` documents matching the question, best first
    pub fn search(&self, question: &str, k: usize) -> Vec<CorpusDocument> {
        let terms = query_terms(question);
        if terms.is_empty() || k == 0 {
            return Vec::new();
        }

        let documents = self.documents.read();
        let mut scored: Vec<(usize, u64, &CorpusDocument)> = documents
            .by_seq
            .iter()
            .filter_map(|(seq, doc)| {
                let haystack = doc.content.to_lowercase();
                let score = terms.iter().filter(|t| haystack.contains(t.as_str())).count();
                (score > 0).then_some((score, *seq, doc))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        scored
            .into_iter()
            .take(k)
            .map(|(_, _, doc)| doc.clone())
            .collect()
    }

    fn documents_for(&self, ordinal: usize, entry: &LogEntry) -> Vec<CorpusDocument> {
        let content = entry.message.trim();
        if content.is_empty() {
            return Vec::new();
        }

        chunk_text(content, self.config.chunk_size, self.config.chunk_overlap)
            .into_iter()
            .enumerate()
            .map(|(part, chunk)| CorpusDocument {
                id: document_id(&chunk, entry, ordinal, part),
                content: chunk,
                timestamp: entry.timestamp.clone(),
                level: entry.severity,
                declared_level: entry.declared_level.clone(),
                ordinal,
            })
            .collect()
    }
}

/// Render documents as a prompt context block
pub fn format_context(documents: &[CorpusDocument]) -> String {
    if documents.is_empty() {
        return NO_MATCHING_LOGS.to_string();
    }
    documents
        .iter()
        .map(|doc| format!("[{}] [{}] {}", doc.timestamp, doc.level, doc.content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn document_id(content: &str, entry: &LogEntry, ordinal: usize, part: usize) -> String {
    let mut hasher = Sha256::new();
    for field in [
        content,
        entry.timestamp.as_str(),
        entry.severity.as_str(),
        entry.declared_level.as_str(),
    ] {
        hasher.update(field.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(ordinal.to_le_bytes());
    hasher.update(part.to_le_bytes());
    hex::encode(hasher.finalize())
}

/// Split into chunks of at most `size` characters, consecutive chunks sharing
/// `overlap` characters. A cut prefers the last whitespace in the second half
/// of the window.
fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let size = size.max(1);
    if chars.len() <= size {
        return vec![text.to_string()];
    }
    let overlap = overlap.min(size / 2);

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let mut end = (start + size).min(chars.len());
        if end < chars.len() {
            let floor = start + size / 2;
            if let Some(ws) = (floor..end).rev().find(|&i| chars[i].is_whitespace()) {
                end = ws + 1;
            }
        }

        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        if end >= chars.len() {
            break;
        }
        start = end.saturating_sub(overlap).max(start + 1);
    }
    chunks
}

/// Distinct lowercase alphanumeric runs of two or more characters
fn query_terms(question: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    question
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| seen.insert(t.to_string()))
        .map(str::to_string)
        .collect()
}
