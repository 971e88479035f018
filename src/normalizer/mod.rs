//! Mapping raw records onto the canonical [`Conversation`] model.
//!
//! Every source goes through the same [`ConversationBuilder`], which owns the
//! invariants shared by all formats:
//!
//! - message timestamps never decrease within a conversation
//! - records without a usable timestamp are placed at the file's modification
//!   time plus one millisecond per message already emitted
//! - a conversation always has at least one message; a file with no renderable
//!   content gets a single `system` placeholder

pub mod claude;
pub mod codex;
pub mod cursor;

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::models::{
    Conversation, METADATA_ONLY_TEXT, Message, MessageContent, MessageType, Metadata, Platform,
    SourceFile, SourceKind, UNKNOWN_PROJECT,
};
use crate::utils::file_modified_time;

/// Keys that may hold text inside a content item, in lookup order
const TEXT_KEYS: &[&str] = &["text", "input_text", "output_text", "content"];

/// Read and normalize one discovered transcript
pub fn normalize_file(file: &SourceFile) -> Result<Conversation> {
    match file.platform {
        Platform::ClaudeCode => claude::normalize_claude_file(file),
        Platform::Codex => codex::normalize_codex_file(file),
        Platform::Cursor => cursor::normalize_cursor_file(file),
    }
}

/// Hands out non-decreasing timestamps for one conversation
#[derive(Debug, Clone)]
pub struct TimestampClock {
    fallback_base: DateTime<Utc>,
    issued: i64,
    last: Option<DateTime<Utc>>,
}

impl TimestampClock {
    pub fn new(fallback_base: DateTime<Utc>) -> Self {
        Self { fallback_base, issued: 0, last: None }
    }

    pub fn for_file(path: &Path) -> Self {
        Self::new(file_modified_time(path))
    }

    /// Next timestamp: the source value when present, otherwise the file time
    /// offset by the number of timestamps already issued; never earlier than
    /// the previous one
    pub fn next(&mut self, source: Option<DateTime<Utc>>) -> DateTime<Utc> {
        let candidate =
            source.unwrap_or_else(|| self.fallback_base + Duration::milliseconds(self.issued));
        let stamped = match self.last {
            Some(last) if last > candidate => last,
            _ => candidate,
        };
        self.issued += 1;
        self.last = Some(stamped);
        stamped
    }
}

/// Accumulates messages and structural counters for one conversation
#[derive(Debug)]
pub struct ConversationBuilder {
    conversation_id: String,
    platform: Platform,
    source_kind: SourceKind,
    parent_conversation_id: Option<String>,
    project: Option<String>,
    metadata: Metadata,
    messages: Vec<Message>,
    clock: TimestampClock,
}

impl ConversationBuilder {
    pub fn new(file: &SourceFile, conversation_id: String) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert("sourceFile".to_string(), Value::from(file.path.to_string_lossy()));
        Self {
            conversation_id,
            platform: file.platform,
            source_kind: file.kind,
            parent_conversation_id: file.parent_id.clone(),
            project: None,
            metadata,
            messages: Vec::new(),
            clock: TimestampClock::for_file(&file.path),
        }
    }

    pub fn set_conversation_id(&mut self, id: impl Into<String>) {
        self.conversation_id = id.into();
    }

    /// Fill in the parent of a subagent run from its records when the directory
    /// layout did not imply one
    pub fn observe_parent(&mut self, session_id: Option<&str>) {
        if self.source_kind != SourceKind::Subagent || self.parent_conversation_id.is_some() {
            return;
        }
        if let Some(id) = session_id.filter(|id| !id.is_empty()) {
            self.parent_conversation_id = Some(id.to_string());
        }
    }

    /// Record the working directory the first time one is seen
    pub fn observe_cwd(&mut self, cwd: Option<&str>) {
        if let Some(cwd) = cwd.filter(|c| !c.trim().is_empty()) {
            if self.project.is_none() {
                self.project = Some(crate::utils::project_name(cwd));
            }
            self.set_once("cwd", cwd);
        }
    }

    /// Set a string metadata key unless it already has a value
    pub fn set_once(&mut self, key: &str, value: &str) {
        self.metadata.entry(key.to_string()).or_insert_with(|| Value::from(value));
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.metadata.insert(key.to_string(), value);
    }

    /// Increment `metadata[key][bucket]`
    pub fn bump(&mut self, key: &str, bucket: &str) {
        bump_counter(&mut self.metadata, key, bucket);
    }

    pub fn push(
        &mut self,
        message_type: MessageType,
        source_timestamp: Option<DateTime<Utc>>,
        content: MessageContent,
    ) {
        let timestamp = self.clock.next(source_timestamp);
        self.messages.push(Message { message_type, timestamp, content });
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Finish the conversation, adding the placeholder when nothing was renderable
    pub fn finish(mut self, file: &SourceFile) -> Conversation {
        if self.messages.is_empty() {
            self.push(MessageType::System, None, MessageContent::Text(METADATA_ONLY_TEXT.into()));
        }

        let project = self
            .project
            .or_else(|| file.project_hint.clone())
            .unwrap_or_else(|| UNKNOWN_PROJECT.to_string());

        Conversation {
            conversation_id: self.conversation_id,
            project,
            platform: self.platform,
            source_kind: self.source_kind,
            parent_conversation_id: self.parent_conversation_id,
            metadata: self.metadata,
            messages: self.messages,
        }
    }
}

/// Increment a nested counter `metadata[key][bucket]`, creating it as needed
pub fn bump_counter(metadata: &mut Metadata, key: &str, bucket: &str) {
    let entry = metadata.entry(key.to_string()).or_insert_with(|| Value::Object(Default::default()));
    if let Value::Object(map) = entry {
        let count = map.get(bucket).and_then(Value::as_u64).unwrap_or(0);
        map.insert(bucket.to_string(), Value::from(count + 1));
    }
}

/// Text of one content item: the first string-valued key among [`TEXT_KEYS`]
pub fn item_text(item: &Value) -> Option<&str> {
    match item {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => TEXT_KEYS.iter().find_map(|key| map.get(*key)?.as_str()),
        _ => None,
    }
}

/// Text of a content field that may be a string, a list of items, or one item
///
/// Returns `None` when no text-bearing key is present or the text is blank.
pub fn extract_text(content: &Value) -> Option<String> {
    let text = match content {
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(item_text).collect();
            parts.join("\n")
        }
        other => item_text(other)?.to_string(),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

/// Shape of a content field as reported in structural counters
pub fn content_shape(content: &Value) -> &'static str {
    match content {
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Null => "absent",
        _ => "other",
    }
}
