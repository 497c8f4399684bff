//! Process-wide metrics aggregator
//!
//! A pure accumulator: counts only ever grow, there is no reset and no
//! terminal state. One mutex guards the four count maps; token extraction
//! runs before the lock is taken so `record` holds it only for the
//! increments, and `snapshot` holds it only for the copy.

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;

use crate::extract;
use crate::models::{LogEntry, MetricsSnapshot, Severity};

/// Source addresses exposed in a snapshot unless configured otherwise
pub const DEFAULT_TOP_IPS: usize = 10;

#[derive(Debug, Default)]
struct Counters {
    requests_per_minute: HashMap<String, u64>,
    error_codes: HashMap<String, u64>,
    levels: HashMap<Severity, u64>,
    ips: HashMap<String, u64>,
}

/// Thread-safe aggregate of every entry recorded during the process lifetime
#[derive(Debug)]
pub struct MetricsAggregator {
    counters: Mutex<Counters>,
    top_ips: usize,
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsAggregator {
    /// Create an empty aggregator exposing the default top-K addresses
    pub fn new() -> Self {
        Self::with_top_ips(DEFAULT_TOP_IPS)
    }

    /// Create an empty aggregator exposing `top_ips` addresses per snapshot
    pub fn with_top_ips(top_ips: usize) -> Self {
        Self {
            counters: Mutex::new(Counters::default()),
            top_ips,
        }
    }

    /// Fold one entry into the running counts
    pub fn record(&self, entry: &LogEntry) {
        let bucket = extract::minute_bucket(&entry.timestamp);
        let code = extract::error_code(&entry.message);
        let address = extract::source_address(&entry.message);

        let mut counters = self.counters.lock();
        *counters.requests_per_minute.entry(bucket).or_insert(0) += 1;
        *counters.levels.entry(entry.severity).or_insert(0) += 1;
        if let Some(code) = code {
            *counters.error_codes.entry(code.to_string()).or_insert(0) += 1;
        }
        if let Some(address) = address {
            *counters.ips.entry(address).or_insert(0) += 1;
        }
    }

    /// Immutable copy of the current counts.
    ///
    /// Every `record` that returned before this call is reflected.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let (requests_per_minute, error_codes, levels, ips) = {
            let counters = self.counters.lock();
            (
                to_sorted(&counters.requests_per_minute),
                to_sorted(&counters.error_codes),
                counters
                    .levels
                    .iter()
                    .map(|(k, v)| (*k, *v))
                    .collect::<BTreeMap<_, _>>(),
                counters.ips.clone(),
            )
        };

        MetricsSnapshot {
            requests_per_minute,
            error_codes,
            levels,
            top_ips: top_k(ips, self.top_ips),
        }
    }

    /// Number of addresses exposed per snapshot
    pub fn top_ips_limit(&self) -> usize {
        self.top_ips
    }
}

fn to_sorted(counts: &HashMap<String, u64>) -> BTreeMap<String, u64> {
    counts.iter().map(|(k, v)| (k.clone(), *v)).collect()
}

/// Highest counts first, ties by address; keeps at most `k`
fn top_k(counts: HashMap<String, u64>, k: usize) -> BTreeMap<String, u64> {
    let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(k).collect()
}
