//! Output formatting (table, json, csv)

use clap::ValueEnum;
use colored::Colorize;
use logsight_core::{MetricsSnapshot, Section, SectionBody, Severity, UploadedEntry};
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};

pub const NOTHING_TO_SHOW: &str = "Nothing to show";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ASCII table (default)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Comma-separated values
    Csv,
}

/// Where and how command results are printed
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Status line; suppressed by `--quiet` and in machine formats
    pub fn success(&self, msg: &str) {
        if self.chatty() {
            println!("{}", msg.green());
        }
    }

    pub fn info(&self, msg: &str) {
        if self.chatty() {
            println!("{}", msg);
        }
    }

    pub fn warn(&self, msg: &str) {
        eprintln!("{}", msg.yellow());
    }

    fn chatty(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Table
    }

    /// Rows in the configured format
    pub fn print<T: Tabled + Serialize>(&self, rows: &[T]) {
        match self.format {
            OutputFormat::Table if rows.is_empty() => {
                if !self.quiet {
                    println!("No data");
                }
            }
            OutputFormat::Table => println!("{}", Table::new(rows)),
            OutputFormat::Json => print_json(&rows),
            OutputFormat::Csv => print!("{}", to_csv(rows)),
        }
    }

    /// A collaborator payload; JSON prints the payload itself, other formats
    /// print its sections
    pub fn print_sections<T: Serialize>(&self, payload: &T, sections: &[Section]) {
        match self.format {
            OutputFormat::Table => print!("{}", render_sections(sections)),
            OutputFormat::Json => print_json(payload),
            OutputFormat::Csv => {
                let rows: Vec<SectionRow> = sections.iter().flat_map(SectionRow::expand).collect();
                if rows.is_empty() {
                    println!("{}", NOTHING_TO_SHOW);
                } else {
                    print!("{}", to_csv(&rows));
                }
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("{}", format!("Failed to encode output: {}", e).red()),
    }
}

/// Titled blocks, one per present field; "Nothing to show" when there are none
pub fn render_sections(sections: &[Section]) -> String {
    if sections.is_empty() {
        return format!("{}\n", NOTHING_TO_SHOW);
    }

    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{}\n", section.title.bold()));
        match &section.body {
            SectionBody::Text(text) => out.push_str(&format!("  {}\n", text)),
            SectionBody::List(items) => {
                for item in items {
                    out.push_str(&format!("  - {}\n", item));
                }
            }
        }
    }
    out
}

/// Header line from the first row's keys, then one line per row
pub fn to_csv<T: Serialize>(rows: &[T]) -> String {
    let values: Vec<serde_json::Value> = rows
        .iter()
        .filter_map(|row| serde_json::to_value(row).ok())
        .collect();
    let Some(serde_json::Value::Object(first)) = values.first() else {
        return String::new();
    };
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut out = headers.join(",");
    out.push('\n');
    for value in &values {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| match value.get(h) {
                Some(serde_json::Value::String(s)) => escape_csv(s),
                Some(serde_json::Value::Null) | None => String::new(),
                Some(other) => escape_csv(&other.to_string()),
            })
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// =============================================================================
// Row types
// =============================================================================

/// One parsed log entry
#[derive(Debug, Tabled, Serialize)]
pub struct EntryRow {
    #[tabled(rename = "Timestamp")]
    pub timestamp: String,
    #[tabled(rename = "Level")]
    pub level: Severity,
    #[tabled(rename = "Declared")]
    pub declared: String,
    #[tabled(rename = "Message")]
    pub message: String,
}

impl From<UploadedEntry> for EntryRow {
    fn from(entry: UploadedEntry) -> Self {
        Self {
            timestamp: entry.timestamp,
            level: entry.level,
            declared: entry.original_level,
            message: entry.message,
        }
    }
}

/// One counter out of a metrics snapshot
#[derive(Debug, Tabled, Serialize)]
pub struct MetricRow {
    #[tabled(rename = "Metric")]
    pub metric: &'static str,
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Count")]
    pub count: u64,
}

impl MetricRow {
    /// Levels, then per-minute buckets, then codes and addresses by count
    pub fn from_snapshot(snapshot: &MetricsSnapshot) -> Vec<Self> {
        let levels = snapshot
            .levels
            .iter()
            .map(|(severity, count)| ("level", severity.to_string(), *count));
        let minutes = snapshot
            .requests_per_minute
            .iter()
            .map(|(minute, count)| ("requests_per_minute", minute.clone(), *count));
        let codes = snapshot
            .error_codes_ranked()
            .into_iter()
            .map(|(code, count)| ("error_code", code, count));
        let ips = snapshot
            .top_ips_ranked()
            .into_iter()
            .map(|(ip, count)| ("top_ip", ip, count));

        levels
            .chain(minutes)
            .chain(codes)
            .chain(ips)
            .map(|(metric, key, count)| Self { metric, key, count })
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct SectionRow {
    section: &'static str,
    value: String,
}

impl SectionRow {
    fn expand(section: &Section) -> Vec<Self> {
        match &section.body {
            SectionBody::Text(text) => vec![Self {
                section: section.title,
                value: text.clone(),
            }],
            SectionBody::List(items) => items
                .iter()
                .map(|item| Self {
                    section: section.title,
                    value: item.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsight_core::{AssistAnswer, InsightReport};
    use pretty_assertions::assert_eq;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_empty_payload_renders_nothing_to_show() {
        plain();
        assert_eq!(
            render_sections(&AssistAnswer::default().sections()),
            "Nothing to show\n"
        );
        assert_eq!(
            render_sections(&InsightReport::default().sections()),
            "Nothing to show\n"
        );
    }

    #[test]
    fn test_only_present_sections_render() {
        plain();
        let answer = AssistAnswer {
            summary: Some("Payments are failing".to_string()),
            findings: Some(vec!["401 from 10.0.0.9".to_string(), "retry storm".to_string()]),
            ..Default::default()
        };

        assert_eq!(
            render_sections(&answer.sections()),
            "Summary\n  Payments are failing\n\nFindings\n  - 401 from 10.0.0.9\n  - retry storm\n"
        );
    }

    #[test]
    fn test_csv_escapes_and_orders_columns() {
        let rows = vec![
            EntryRow {
                timestamp: "2025-08-03 12:45:12".to_string(),
                level: Severity::Error,
                declared: "ERROR".to_string(),
                message: "Payment failed, \"card\" declined".to_string(),
            },
            EntryRow {
                timestamp: "2025-08-03 12:46:00".to_string(),
                level: Severity::Info,
                declared: "INFO".to_string(),
                message: "ok".to_string(),
            },
        ];

        let csv = to_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("timestamp"));
        assert!(lines[0].contains("message"));
        assert!(lines[1].contains("\"Payment failed, \"\"card\"\" declined\""));
        assert!(lines[2].contains("INFO"));
    }

    #[test]
    fn test_csv_of_nothing_is_empty() {
        let rows: Vec<EntryRow> = Vec::new();
        assert_eq!(to_csv(&rows), "");
    }

    #[test]
    fn test_metric_rows_follow_snapshot() {
        let mut snapshot = MetricsSnapshot::default();
        snapshot.levels.insert(Severity::Error, 2);
        snapshot
            .requests_per_minute
            .insert("2025-08-03 12:46".to_string(), 2);
        snapshot.error_codes.insert("401".to_string(), 1);
        snapshot.error_codes.insert("504".to_string(), 3);
        snapshot.top_ips.insert("10.0.0.9".to_string(), 2);

        let rows = MetricRow::from_snapshot(&snapshot);
        let keys: Vec<(&str, &str, u64)> = rows
            .iter()
            .map(|r| (r.metric, r.key.as_str(), r.count))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("level", "ERROR", 2),
                ("requests_per_minute", "2025-08-03 12:46", 2),
                ("error_code", "504", 3),
                ("error_code", "401", 1),
                ("top_ip", "10.0.0.9", 2),
            ]
        );
    }
}
