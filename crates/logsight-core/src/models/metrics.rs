//! Aggregate metrics snapshot

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entry::Severity;

/// Bucket key used when a timestamp has no recoverable clock
pub const UNKNOWN_BUCKET: &str = "unknown";

/// Immutable point-in-time copy of the aggregate state.
///
/// Maps are ordered so serialized snapshots are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Minute bucket → entry count
    pub requests_per_minute: BTreeMap<String, u64>,
    /// Error-code token → count
    pub error_codes: BTreeMap<String, u64>,
    /// Severity → count
    pub levels: BTreeMap<Severity, u64>,
    /// Top source addresses → count
    pub top_ips: BTreeMap<String, u64>,
}

impl MetricsSnapshot {
    /// Total entries recorded (sum of `levels`)
    pub fn total(&self) -> u64 {
        self.levels.values().sum()
    }

    /// Count for one severity (zero when never seen)
    pub fn level(&self, severity: Severity) -> u64 {
        self.levels.get(&severity).copied().unwrap_or(0)
    }

    /// `top_ips` ordered by count descending, then address
    pub fn top_ips_ranked(&self) -> Vec<(String, u64)> {
        rank(&self.top_ips)
    }

    /// `error_codes` ordered by count descending, then code
    pub fn error_codes_ranked(&self) -> Vec<(String, u64)> {
        rank(&self.error_codes)
    }
}

/// Order a count map by count descending, ties by key ascending
pub(crate) fn rank(counts: &BTreeMap<String, u64>) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_and_level() {
        let mut snapshot = MetricsSnapshot::default();
        snapshot.levels.insert(Severity::Error, 3);
        snapshot.levels.insert(Severity::Info, 2);
        assert_eq!(snapshot.total(), 5);
        assert_eq!(snapshot.level(Severity::Error), 3);
        assert_eq!(snapshot.level(Severity::Success), 0);
    }

    #[test]
    fn test_serialized_shape() {
        let mut snapshot = MetricsSnapshot::default();
        snapshot.levels.insert(Severity::Error, 1);
        snapshot.top_ips.insert("10.0.0.1".to_string(), 4);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["levels"]["ERROR"], 1);
        assert_eq!(value["top_ips"]["10.0.0.1"], 4);
        assert!(value["requests_per_minute"].as_object().unwrap().is_empty());
        assert!(value["error_codes"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_ranked_ties_by_key() {
        let mut snapshot = MetricsSnapshot::default();
        snapshot.top_ips.insert("10.0.0.2".to_string(), 2);
        snapshot.top_ips.insert("10.0.0.1".to_string(), 2);
        snapshot.top_ips.insert("10.0.0.3".to_string(), 5);

        let ranked = snapshot.top_ips_ranked();
        assert_eq!(ranked[0], ("10.0.0.3".to_string(), 5));
        assert_eq!(ranked[1], ("10.0.0.1".to_string(), 2));
        assert_eq!(ranked[2], ("10.0.0.2".to_string(), 2));
    }
}
