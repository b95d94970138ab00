//! Rendering of selected entries into tagged message lines.

use std::collections::HashMap;
use supermemory_core::markup::{self, Role};
use supermemory_core::redact::{clean_content, truncate};
use supermemory_core::transcript::{
    ContentBlock, ConversationEntry, MessageContent, TranscriptEntry,
};
use supermemory_settings::ToolInclusionList;

/// Cap on a rendered tool-result body.
pub const MAX_TOOL_RESULT_CHARS: usize = 500;
/// Cap on each value in a compacted tool-input rendering.
pub const MAX_TOOL_INPUT_VALUE_CHARS: usize = 100;

/// Per-run formatter.
///
/// Owns the inclusion policy and the tool-use index built while walking
/// assistant entries: a `tool_result` block carries only the invocation id,
/// so the name has to be remembered from the matching `tool_use`. Both are
/// scoped to one capture pass; a fresh formatter is built per run.
pub struct MessageFormatter {
    include_tools: ToolInclusionList,
    tool_names: HashMap<String, String>,
}

impl MessageFormatter {
    pub fn new(include_tools: ToolInclusionList) -> Self {
        Self {
            include_tools,
            tool_names: HashMap::new(),
        }
    }

    /// Render one entry to zero or more tagged lines, newline-joined.
    /// Non-conversation entries and entries that render nothing yield `None`.
    pub fn format_entry(&mut self, entry: &TranscriptEntry) -> Option<String> {
        match entry {
            TranscriptEntry::User(conv) => self.format_user(conv),
            TranscriptEntry::Assistant(conv) => self.format_assistant(conv),
            _ => None,
        }
    }

    fn format_user(&self, conv: &ConversationEntry) -> Option<String> {
        let content = conv.message.as_ref()?.content.as_ref()?;
        let mut lines = Vec::new();

        match content {
            MessageContent::Text(text) => {
                let cleaned = clean_content(text);
                if !cleaned.is_empty() {
                    lines.push(markup::message_line(Role::User, &cleaned));
                }
            }
            MessageContent::Blocks(blocks) => {
                for block in blocks {
                    match block {
                        ContentBlock::Text { text } => {
                            let cleaned = clean_content(text);
                            if !cleaned.is_empty() {
                                lines.push(markup::message_line(Role::User, &cleaned));
                            }
                        }
                        ContentBlock::ToolResult {
                            tool_use_id,
                            content,
                            is_error,
                        } => {
                            let tool_name = self
                                .tool_names
                                .get(tool_use_id)
                                .map(String::as_str)
                                .unwrap_or("Unknown");
                            // Results of excluded tools are dropped without
                            // a placeholder, unlike excluded tool_use.
                            if !self.include_tools.includes(tool_name) {
                                continue;
                            }
                            let body =
                                truncate(&clean_content(&content.to_text()), MAX_TOOL_RESULT_CHARS);
                            if body.is_empty() {
                                continue;
                            }
                            let status = if *is_error { "error" } else { "success" };
                            lines.push(markup::message_line(
                                Role::AssistantToolResult,
                                &format!("{tool_name}({status}): {body}"),
                            ));
                        }
                        _ => {}
                    }
                }
            }
        }

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    fn format_assistant(&mut self, conv: &ConversationEntry) -> Option<String> {
        let content = conv.message.as_ref()?.content.as_ref()?;
        let MessageContent::Blocks(blocks) = content else {
            return None;
        };

        let mut lines = Vec::new();
        // Mentions of excluded tools accumulate here until the next rendered
        // text absorbs them as a prefix.
        let mut pending_skipped: Vec<String> = Vec::new();

        for block in blocks {
            match block {
                ContentBlock::Thinking {} => {}
                ContentBlock::Text { text } => {
                    let cleaned = clean_content(text);
                    if cleaned.is_empty() {
                        continue;
                    }
                    let line = if pending_skipped.is_empty() {
                        cleaned
                    } else {
                        format!("{} {cleaned}", pending_skipped.join(" "))
                    };
                    pending_skipped.clear();
                    lines.push(markup::message_line(Role::Assistant, &line));
                }
                ContentBlock::ToolUse { id, name, input } => {
                    // Register regardless of inclusion: a later tool_result
                    // still needs the name for its inclusion check.
                    if let Some(id) = id {
                        if !id.is_empty() {
                            self.tool_names.insert(id.clone(), name.clone());
                        }
                    }
                    if !self.include_tools.includes(name) {
                        pending_skipped.push(format!("Assistant uses {name} tool."));
                        continue;
                    }
                    if !pending_skipped.is_empty() {
                        lines.push(markup::message_line(
                            Role::Assistant,
                            &pending_skipped.join(" "),
                        ));
                        pending_skipped.clear();
                    }
                    lines.push(markup::message_line(
                        Role::AssistantTool,
                        &format!("{name}: {}", compact_tool_input(input)),
                    ));
                }
                _ => {}
            }
        }

        if !pending_skipped.is_empty() {
            lines.push(markup::message_line(
                Role::Assistant,
                &pending_skipped.join(" "),
            ));
        }

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

/// Compact a tool's input object to space-joined `key="value"` pairs in
/// input order. String values pass through; anything else is rendered as
/// JSON text. Each value is capped at [`MAX_TOOL_INPUT_VALUE_CHARS`].
fn compact_tool_input(input: &serde_json::Value) -> String {
    let Some(map) = input.as_object() else {
        return String::new();
    };
    map.iter()
        .map(|(key, value)| {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{key}=\"{}\"", truncate(&rendered, MAX_TOOL_INPUT_VALUE_CHARS))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
