//! Codex CLI session records.
//!
//! Every line is `{"timestamp", "type", "payload"}`. Conversation content only
//! comes from `response_item` records, whose payload carries its own `type`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::deserializers::deserialize_optional_timestamp;

/// One line of a Codex session log
#[derive(Debug, Clone, PartialEq)]
pub struct CodexLine {
    pub timestamp: Option<DateTime<Utc>>,
    /// The raw `type` discriminator, kept for structural counters
    pub record_type: String,
    pub record: CodexRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CodexRecord {
    SessionMeta(SessionMeta),
    ResponseItem { item_type: String, item: ResponseItem },
    EventMsg { event_type: String },
    TurnContext { cwd: Option<String> },
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SessionMeta {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub originator: Option<String>,
    #[serde(default)]
    pub cli_version: Option<String>,
}

/// Payload of a `response_item` record
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseItem {
    Message {
        role: String,
        #[serde(default)]
        content: Value,
    },
    FunctionCall {
        name: String,
        #[serde(default)]
        call_id: Option<String>,
    },
    CustomToolCall {
        name: String,
        #[serde(default)]
        call_id: Option<String>,
    },
    FunctionCallOutput,
    CustomToolCallOutput,
    Reasoning,
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct RawLine {
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "type", default)]
    record_type: Option<String>,
    #[serde(default)]
    payload: Value,
}

impl CodexLine {
    /// Classify a raw record by its `type` discriminator and, for response
    /// items, by the payload's own `type`
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let raw: RawLine = serde_json::from_value(value)?;
        let record_type = raw.record_type.unwrap_or_else(|| "unknown".to_string());
        let payload_type =
            raw.payload.get("type").and_then(Value::as_str).unwrap_or("unknown").to_string();

        let record = match record_type.as_str() {
            "session_meta" => CodexRecord::SessionMeta(serde_json::from_value(raw.payload)?),
            "response_item" => CodexRecord::ResponseItem {
                item: serde_json::from_value(raw.payload)?,
                item_type: payload_type,
            },
            "event_msg" => CodexRecord::EventMsg { event_type: payload_type },
            "turn_context" => CodexRecord::TurnContext {
                cwd: raw.payload.get("cwd").and_then(Value::as_str).map(str::to_string),
            },
            _ => CodexRecord::Unknown,
        };

        Ok(Self { timestamp: raw.timestamp, record_type, record })
    }
}
