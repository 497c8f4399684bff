//! Prompt construction
//!
//! The reasoning itself belongs to the external service; these prompts only
//! pin down the JSON contract the decoder expects back.

use logsight_core::{format_context, CorpusDocument, LogEntry};

/// Entries beyond this are summarized by count instead of listed
pub const MAX_PROMPT_ENTRIES: usize = 400;

pub const ANSWER_SYSTEM: &str = "You are a precise log analysis assistant. \
Use only the provided context logs; if they are insufficient, say so plainly. \
Reply with a single JSON object and nothing else.";

pub const INSIGHTS_SYSTEM: &str = "You are a log analysis assistant. \
Reply with a single JSON object and nothing else.";

/// User turn for a question against retrieved context
pub fn answer_prompt(question: &str, context: &[CorpusDocument]) -> String {
    format!(
        "Question: {question}\n\n\
         Context logs (relevance-ranked):\n{context}\n\n\
         Return JSON with fields:\n\
         - \"summary\": short, direct answer grounded in the logs\n\
         - \"severity\": one of SUCCESS/INFO/WARNING/ERROR\n\
         - \"findings\": array of key findings from the context\n\
         - \"recommendations\": array of actionable steps\n\
         - \"citations\": array of short log snippets used as evidence",
        context = format_context(context),
    )
}

/// User turn asking for narrative insights over parsed entries
pub fn insights_prompt(entries: &[LogEntry]) -> String {
    let mut lines: Vec<String> = entries
        .iter()
        .take(MAX_PROMPT_ENTRIES)
        .map(|e| format!("{} | {} | {}", e.timestamp, e.severity, e.message))
        .collect();
    if entries.len() > MAX_PROMPT_ENTRIES {
        lines.push(format!(
            "... {} more entries omitted",
            entries.len() - MAX_PROMPT_ENTRIES
        ));
    }

    format!(
        "Return JSON with fields:\n\
         - \"summary\": one paragraph\n\
         - \"insights\": array of key findings\n\
         - \"anomalies\": array of errors, warnings or unusual patterns\n\
         - \"recommendations\": array of concrete actions\n\
         - \"threat_level\": one of Low/Medium/High\n\n\
         Logs:\n{}",
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsight_core::NO_MATCHING_LOGS;

    #[test]
    fn test_answer_prompt_embeds_question_and_context() {
        let prompt = answer_prompt("what failed?", &[]);
        assert!(prompt.starts_with("Question: what failed?"));
        assert!(prompt.contains(NO_MATCHING_LOGS));
    }

    #[test]
    fn test_insights_prompt_caps_entries() {
        let entries: Vec<LogEntry> = (0..MAX_PROMPT_ENTRIES + 3)
            .map(|i| LogEntry::new("t", "INFO", format!("event {}", i)))
            .collect();
        let prompt = insights_prompt(&entries);
        assert!(prompt.contains("t | INFO | event 0"));
        assert!(!prompt.contains(&format!("event {}", MAX_PROMPT_ENTRIES)));
        assert!(prompt.ends_with("... 3 more entries omitted"));
    }
}
