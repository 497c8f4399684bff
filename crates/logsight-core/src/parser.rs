//! Entry parser
//!
//! Recognizes lines shaped like
//!
//! ```text
//! [2025-08-03 12:45:12] INFO: User logged in
//! ^                   ^ ^   ^ ^
//! open                close level colon message
//! ```
//!
//! The grammar is scanned by hand:
//!
//! 1. The first `[` in the line opens the timestamp (anything may precede it).
//! 2. The timestamp closes at the first `]` that is followed by optional
//!    whitespace, one or more ASCII word characters (`[A-Za-z0-9_]`) and a `:`.
//!    Earlier `]`s that do not satisfy this become part of the timestamp.
//! 3. Whitespace after the colon is skipped; the rest of the line is the
//!    message, taken as-is (further brackets and colons are not re-parsed).
//!
//! Only the first `[` needs trying: a later opening bracket can only see a
//! subset of the closing brackets the first one sees.

use crate::models::LogEntry;

/// Fields borrowed from a conforming line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub timestamp: &'a str,
    pub level: &'a str,
    pub message: &'a str,
}

impl<'a> ParsedLine<'a> {
    /// Owned, classified entry
    pub fn into_entry(self) -> LogEntry {
        LogEntry::new(self.timestamp, self.level, self.message)
    }
}

/// Parse one line. `None` means the line does not conform and is dropped.
pub fn parse_line(line: &str) -> Option<ParsedLine<'_>> {
    let open = line.find('[')?;
    let ts_start = open + 1;

    let mut search_from = ts_start;
    while let Some(rel) = line[search_from..].find(']') {
        let close = search_from + rel;
        if let Some((level, message)) = level_and_message(&line[close + 1..]) {
            return Some(ParsedLine {
                timestamp: &line[ts_start..close],
                level,
                message,
            });
        }
        search_from = close + 1;
    }

    None
}

/// `\s*(\w+):\s*(.*)` anchored at the start of `rest`
fn level_and_message(rest: &str) -> Option<(&str, &str)> {
    let rest = rest.trim_start();
    let level_len: usize = rest
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .map(char::len_utf8)
        .sum();
    if level_len == 0 {
        return None;
    }

    let (level, after) = rest.split_at(level_len);
    let message = after.strip_prefix(':')?;
    Some((level, message.trim_start()))
}
