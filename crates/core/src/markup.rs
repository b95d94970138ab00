//! The delimiter-tagged vocabulary captured turns are rendered with.
//!
//! A captured block looks like:
//!
//! ```text
//! <|turn_start|>2026-01-01T09:30:00.000Z
//!
//! <|start|>user<|message|>Fix the flaky test<|end|>
//!
//! <|start|>assistant<|message|>Looking at it now.<|end|>
//!
//! <|turn_end|>
//! ```
//!
//! Downstream consumers split on these tags, so they are wire format and
//! must not change.

pub const TURN_START: &str = "<|turn_start|>";
pub const TURN_END: &str = "<|turn_end|>";
pub const MESSAGE_START: &str = "<|start|>";
pub const MESSAGE_BODY: &str = "<|message|>";
pub const MESSAGE_END: &str = "<|end|>";

/// Speaker tag carried inside a message line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    /// Tool output echoed back into the conversation.
    AssistantToolResult,
    /// A tool invocation the assistant made.
    AssistantTool,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::AssistantToolResult => "assistant:tool_result",
            Role::AssistantTool => "assistant:tool",
        }
    }
}

/// One tagged message line.
pub fn message_line(role: Role, content: &str) -> String {
    format!(
        "{MESSAGE_START}{}{MESSAGE_BODY}{content}{MESSAGE_END}",
        role.as_str()
    )
}

/// Opening marker of a turn block, carrying the turn's timestamp.
pub fn turn_start(timestamp: &str) -> String {
    format!("{TURN_START}{timestamp}")
}
