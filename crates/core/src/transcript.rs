use serde::Deserialize;

/// Top-level entry in a Claude Code session transcript.
/// Each JSONL line decodes to one of these.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum TranscriptEntry {
    #[serde(rename = "user")]
    User(ConversationEntry),
    #[serde(rename = "assistant")]
    Assistant(ConversationEntry),
    #[serde(rename = "system")]
    System {},
    #[serde(rename = "summary")]
    Summary {},
    #[serde(rename = "progress")]
    Progress {},
    // Catch-all for entry types capture never renders
    #[serde(other)]
    Unknown,
}

impl TranscriptEntry {
    /// The payload shared by the two conversation variants.
    pub fn conversation(&self) -> Option<&ConversationEntry> {
        match self {
            Self::User(conv) | Self::Assistant(conv) => Some(conv),
            _ => None,
        }
    }

    pub fn is_conversation(&self) -> bool {
        self.conversation().is_some()
    }

    pub fn uuid(&self) -> Option<&str> {
        self.conversation().map(|conv| conv.uuid.as_str())
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.conversation().and_then(|conv| conv.timestamp.as_deref())
    }
}

/// A user or assistant transcript line. `uuid` is the cursor marker, so a
/// line without one counts as malformed and never reaches this type.
#[derive(Debug, Deserialize)]
pub struct ConversationEntry {
    pub uuid: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// Claude Code represents message content as either a plain string
/// or an array of content blocks.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        text: String,
    },
    #[serde(rename = "thinking")]
    Thinking {},
    #[serde(rename = "tool_use")]
    ToolUse {
        #[serde(default)]
        id: Option<String>,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },
    #[serde(rename = "tool_result")]
    ToolResult {
        tool_use_id: String,
        #[serde(default)]
        content: ToolResultContent,
        #[serde(default)]
        is_error: bool,
    },
    // Skip unknown block types gracefully
    #[serde(other)]
    Other,
}

/// tool_result content can be a string, an array of blocks, or absent.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
#[derive(Default)]
pub enum ToolResultContent {
    Text(String),
    Blocks(Vec<ToolResultBlock>),
    #[default]
    Null,
}

impl ToolResultContent {
    /// Coerce to plain text. Nested text blocks join with newlines;
    /// absent content is empty.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Blocks(blocks) => blocks
                .iter()
                .filter_map(|block| match block {
                    ToolResultBlock::Text { text } => Some(text.as_str()),
                    ToolResultBlock::Other => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Null => String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ToolResultBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}
