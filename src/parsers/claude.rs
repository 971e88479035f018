//! Claude Code session records.
//!
//! Each line of a session file is one record discriminated by `type`. Only
//! `user`, `assistant` and `system` records carry conversation content; the
//! rest are bookkeeping the normalizer only counts.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::deserializers::deserialize_optional_timestamp;
use super::jsonl::record_type;

#[derive(Debug, Clone, PartialEq)]
pub enum ClaudeRecord {
    User(ClaudeTurn),
    Assistant(ClaudeTurn),
    System(ClaudeSystemEntry),
    Summary,
    FileHistorySnapshot,
    Unknown(String),
}

/// A user or assistant record
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaudeTurn {
    #[serde(default)]
    pub message: Option<ClaudeMessage>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub git_branch: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub is_meta: bool,
    #[serde(default)]
    pub is_sidechain: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ClaudeMessage {
    #[serde(default)]
    pub role: Option<String>,
    /// A string, a list of typed blocks, or absent
    #[serde(default)]
    pub content: Value,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaudeSystemEntry {
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
}

/// One entry of a `message.content` list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClaudeBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    ToolUse {
        name: String,
        #[serde(default)]
        id: Option<String>,
    },
    ServerToolUse {
        name: String,
        #[serde(default)]
        id: Option<String>,
    },
    ToolResult {
        #[serde(default)]
        tool_use_id: Option<String>,
    },
    Thinking,
    RedactedThinking,
    #[serde(other)]
    Other,
}

impl ClaudeBlock {
    /// Decode a content block; shapes that do not fit any variant become `Other`
    pub fn from_value(value: &Value) -> Self {
        ClaudeBlock::deserialize(value).unwrap_or(ClaudeBlock::Other)
    }
}

impl ClaudeRecord {
    /// Classify a raw record by its `type` discriminator
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let record_type = record_type(&value).to_string();
        let record = match record_type.as_str() {
            "user" => ClaudeRecord::User(serde_json::from_value(value)?),
            "assistant" => ClaudeRecord::Assistant(serde_json::from_value(value)?),
            "system" => ClaudeRecord::System(serde_json::from_value(value)?),
            "summary" => ClaudeRecord::Summary,
            "file-history-snapshot" => ClaudeRecord::FileHistorySnapshot,
            _ => ClaudeRecord::Unknown(record_type),
        };
        Ok(record)
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            ClaudeRecord::User(turn) | ClaudeRecord::Assistant(turn) => turn.session_id.as_deref(),
            ClaudeRecord::System(entry) => entry.session_id.as_deref(),
            ClaudeRecord::Summary
            | ClaudeRecord::FileHistorySnapshot
            | ClaudeRecord::Unknown(_) => None,
        }
    }

    pub fn cwd(&self) -> Option<&str> {
        match self {
            ClaudeRecord::User(turn) | ClaudeRecord::Assistant(turn) => turn.cwd.as_deref(),
            ClaudeRecord::System(entry) => entry.cwd.as_deref(),
            ClaudeRecord::Summary
            | ClaudeRecord::FileHistorySnapshot
            | ClaudeRecord::Unknown(_) => None,
        }
    }
}
