use anyhow::Result;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::{ConversationBuilder, extract_text};
use crate::models::{ContentItem, Conversation, MessageContent, MessageType, SourceFile};
use crate::parsers::codex::SessionMeta;
use crate::parsers::{
    CodexLine, CodexRecord, JsonLines, ResponseItem, read_json_lines, record_type,
};

/// Prefixes of user-role messages that Codex injects rather than the user typing them
const INJECTED_CONTEXT_PREFIXES: &[&str] = &["<environment_context>", "<user_instructions>"];

const UUID_LEN: usize = 36;

pub fn normalize_codex_file(file: &SourceFile) -> Result<Conversation> {
    let lines = read_json_lines(&file.path)?;
    Ok(normalize_codex_records(file, lines))
}

/// Build a conversation from parsed Codex session records
pub fn normalize_codex_records(file: &SourceFile, lines: JsonLines) -> Conversation {
    let stem = file.stem();
    let mut builder = ConversationBuilder::new(file, id_from_stem(&stem));
    if lines.skipped > 0 {
        builder.set("skippedLines", Value::from(lines.skipped));
    }

    for value in lines.records {
        builder.bump("recordTypes", record_type(&value));

        let line = match CodexLine::from_value(value) {
            Ok(line) => line,
            Err(e) => {
                debug!("Skipping malformed record in {}: {}", file.path.display(), e);
                continue;
            }
        };

        match line.record {
            CodexRecord::SessionMeta(meta) => apply_session_meta(&mut builder, meta),
            CodexRecord::TurnContext { cwd } => builder.observe_cwd(cwd.as_deref()),
            CodexRecord::EventMsg { event_type } => builder.bump("eventTypes", &event_type),
            CodexRecord::ResponseItem { item_type, item } => {
                builder.bump("responseItemTypes", &item_type);
                push_response_item(&mut builder, line.timestamp, item);
            }
            CodexRecord::Unknown => {}
        }
    }

    builder.finish(file)
}

fn apply_session_meta(builder: &mut ConversationBuilder, meta: SessionMeta) {
    if let Some(id) = meta.id.filter(|id| !id.is_empty()) {
        builder.set_conversation_id(id);
    }
    builder.observe_cwd(meta.cwd.as_deref());
    if let Some(originator) = meta.originator.as_deref() {
        builder.set_once("originator", originator);
    }
    if let Some(version) = meta.cli_version.as_deref() {
        builder.set_once("cliVersion", version);
    }
}

fn push_response_item(
    builder: &mut ConversationBuilder,
    timestamp: Option<chrono::DateTime<chrono::Utc>>,
    item: ResponseItem,
) {
    match item {
        ResponseItem::Message { role, content } => {
            let Some(text) = extract_text(&content) else {
                return;
            };
            match role.as_str() {
                "user" if is_injected_context(&text) => {
                    builder.push(MessageType::System, timestamp, MessageContent::Text(text))
                }
                "user" => builder.push(MessageType::User, timestamp, MessageContent::Text(text)),
                "assistant" => builder.push(
                    MessageType::Assistant,
                    timestamp,
                    MessageContent::Items(vec![ContentItem::Text { text }]),
                ),
                _ => builder.push(MessageType::System, timestamp, MessageContent::Text(text)),
            }
        }
        ResponseItem::FunctionCall { name, call_id }
        | ResponseItem::CustomToolCall { name, call_id } => builder.push(
            MessageType::Assistant,
            timestamp,
            MessageContent::Items(vec![ContentItem::ToolUse { name, id: call_id }]),
        ),
        ResponseItem::FunctionCallOutput
        | ResponseItem::CustomToolCallOutput
        | ResponseItem::Reasoning
        | ResponseItem::Other => {}
    }
}

fn is_injected_context(text: &str) -> bool {
    INJECTED_CONTEXT_PREFIXES.iter().any(|prefix| text.starts_with(prefix))
}

/// `rollout-2025-09-01T10-00-00-<uuid>` → `<uuid>`, or the whole stem
fn id_from_stem(stem: &str) -> String {
    if stem.len() >= UUID_LEN && stem.is_char_boundary(stem.len() - UUID_LEN) {
        let tail = &stem[stem.len() - UUID_LEN..];
        if Uuid::parse_str(tail).is_ok() {
            return tail.to_string();
        }
    }
    stem.to_string()
}
