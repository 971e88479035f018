use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Project name used when no working directory can be inferred
pub const UNKNOWN_PROJECT: &str = "unknown";

/// Text of the synthetic message added to conversations with no renderable content
pub const METADATA_ONLY_TEXT: &str = "(metadata only)";

/// Assistant tool that produced a transcript
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    ClaudeCode,
    Codex,
    Cursor,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::ClaudeCode, Platform::Codex, Platform::Cursor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::ClaudeCode => "claude-code",
            Platform::Codex => "codex",
            Platform::Cursor => "cursor",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "claude-code" | "claude" => Ok(Platform::ClaudeCode),
            "codex" => Ok(Platform::Codex),
            "cursor" => Ok(Platform::Cursor),
            other => anyhow::bail!("Unknown source platform: {}", other),
        }
    }
}

/// Whether a conversation is a top-level session or a nested sub-task run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Main,
    Subagent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    User,
    Assistant,
    System,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::User => "user",
            MessageType::Assistant => "assistant",
            MessageType::System => "system",
        }
    }
}

/// One semantic unit inside a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Text {
        text: String,
    },
    ToolUse {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    ToolResult {
        #[serde(rename = "toolUseId", default, skip_serializing_if = "Option::is_none")]
        tool_use_id: Option<String>,
    },
    Thinking {},
}

impl ContentItem {
    pub fn kind(&self) -> &'static str {
        match self {
            ContentItem::Text { .. } => "text",
            ContentItem::ToolUse { .. } => "tool_use",
            ContentItem::ToolResult { .. } => "tool_result",
            ContentItem::Thinking {} => "thinking",
        }
    }
}

/// Message body: a free-text turn or a list of content items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Items(Vec<ContentItem>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub timestamp: DateTime<Utc>,
    pub content: MessageContent,
}

impl Message {
    /// Plain-string content, if this message is a free-text turn
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(text) => Some(text),
            MessageContent::Items(_) => None,
        }
    }

    /// Names of tools invoked by this message, in order
    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        let items: &[ContentItem] = match &self.content {
            MessageContent::Items(items) => items,
            MessageContent::Text(_) => &[],
        };
        items.iter().filter_map(|item| match item {
            ContentItem::ToolUse { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Tool invocations counted by the analytics passes (assistant messages only)
    pub fn assistant_tool_names(&self) -> impl Iterator<Item = &str> {
        let is_assistant = self.message_type == MessageType::Assistant;
        self.tool_names().filter(move |_| is_assistant)
    }

    /// Text of a user turn, when it is a plain-string prompt
    pub fn user_prompt(&self) -> Option<&str> {
        if self.message_type == MessageType::User { self.text() } else { None }
    }
}

/// Source-specific structural counters; keys are documented per source and optional
pub type Metadata = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub conversation_id: String,
    pub project: String,
    pub platform: Platform,
    pub source_kind: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_conversation_id: Option<String>,
    pub metadata: Metadata,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.messages.first().map(|m| m.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.messages.last().map(|m| m.timestamp)
    }

    /// Number of user turns carrying a plain-text prompt
    pub fn user_turns(&self) -> usize {
        self.messages.iter().filter(|m| m.user_prompt().is_some()).count()
    }

    pub fn count_messages(&self, message_type: MessageType) -> usize {
        self.messages.iter().filter(|m| m.message_type == message_type).count()
    }

    /// Ordered tool names across the whole conversation
    pub fn tool_sequence(&self) -> Vec<&str> {
        self.messages.iter().flat_map(|m| m.assistant_tool_names()).collect()
    }

    pub fn tool_use_count(&self) -> usize {
        self.messages.iter().map(|m| m.assistant_tool_names().count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_platform_round_trips_through_str() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
        assert!("vim".parse::<Platform>().is_err());
    }

    #[test]
    fn test_message_serializes_with_wire_names() {
        let message = Message {
            message_type: MessageType::Assistant,
            timestamp: ts("2025-01-02T03:04:05Z"),
            content: MessageContent::Items(vec![
                ContentItem::Text { text: "ok".to_string() },
                ContentItem::ToolUse { name: "Read".to_string(), id: None },
            ]),
        };

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "assistant");
        assert_eq!(json["timestamp"], "2025-01-02T03:04:05Z");
        assert_eq!(json["content"][1]["type"], "tool_use");
        assert_eq!(json["content"][1]["name"], "Read");
        assert!(json["content"][1].get("id").is_none());
    }

    #[test]
    fn test_tool_names_only_counted_for_assistant() {
        let items = MessageContent::Items(vec![ContentItem::ToolUse {
            name: "Bash".to_string(),
            id: Some("t1".to_string()),
        }]);
        let assistant = Message {
            message_type: MessageType::Assistant,
            timestamp: ts("2025-01-02T03:04:05Z"),
            content: items.clone(),
        };
        let user = Message { message_type: MessageType::User, ..assistant.clone() };

        assert_eq!(assistant.assistant_tool_names().collect::<Vec<_>>(), vec!["Bash"]);
        assert_eq!(user.assistant_tool_names().count(), 0);
        assert_eq!(user.tool_names().count(), 1);
    }

    #[test]
    fn test_conversation_omits_missing_parent() {
        let conversation = Conversation {
            conversation_id: "abc".to_string(),
            project: UNKNOWN_PROJECT.to_string(),
            platform: Platform::Cursor,
            source_kind: SourceKind::Main,
            parent_conversation_id: None,
            metadata: Metadata::new(),
            messages: vec![],
        };

        let json = serde_json::to_value(&conversation).unwrap();
        assert_eq!(json["platform"], "cursor");
        assert_eq!(json["sourceKind"], "main");
        assert!(json.get("parentConversationId").is_none());
    }
}
