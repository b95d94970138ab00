//! Removal of machine-injected spans before transcript text is rendered.

use regex::Regex;
use std::sync::LazyLock;

static SYSTEM_REMINDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<system-reminder>.*?</system-reminder>").unwrap());

static MEMORY_CONTEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<supermemory-context>.*?</supermemory-context>").unwrap());

/// Strip `<system-reminder>` and `<supermemory-context>` spans, then trim.
///
/// Both tags wrap text the tooling injected into the conversation; captured
/// turns must carry only what the participants actually said.
pub fn clean_content(text: &str) -> String {
    let stripped = SYSTEM_REMINDER_RE.replace_all(text, "");
    let stripped = MEMORY_CONTEXT_RE.replace_all(&stripped, "");
    stripped.trim().to_string()
}

/// Cap `text` at `max_chars` characters, appending `...` when it was cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...")
}
