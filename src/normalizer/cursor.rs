use anyhow::Result;
use serde_json::Value;

use super::ConversationBuilder;
use crate::models::{ContentItem, Conversation, MessageContent, MessageType, SourceFile};
use crate::parsers::{TranscriptBlock, TranscriptRole, read_transcript_blocks};

pub fn normalize_cursor_file(file: &SourceFile) -> Result<Conversation> {
    let blocks = read_transcript_blocks(&file.path)?;
    Ok(normalize_cursor_blocks(file, blocks))
}

/// Build a conversation from transcript blocks
///
/// Transcripts carry no timestamps, so every message is stamped from the file
/// modification time with per-message offsets.
pub fn normalize_cursor_blocks(file: &SourceFile, blocks: Vec<TranscriptBlock>) -> Conversation {
    let mut builder = ConversationBuilder::new(file, file.stem());
    let mut tool_calls = 0usize;

    for block in blocks {
        builder.bump("blocks", block.role.as_str());
        tool_calls += block.tool_calls.len();

        let text = block.text();
        match block.role {
            TranscriptRole::User => {
                if !text.is_empty() {
                    builder.push(MessageType::User, None, MessageContent::Text(text));
                }
            }
            TranscriptRole::Assistant => {
                let mut items = Vec::with_capacity(block.tool_calls.len() + 1);
                if !text.is_empty() {
                    items.push(ContentItem::Text { text });
                }
                items.extend(
                    block.tool_calls.into_iter().map(|name| ContentItem::ToolUse { name, id: None }),
                );
                if !items.is_empty() {
                    builder.push(MessageType::Assistant, None, MessageContent::Items(items));
                }
            }
        }
    }

    builder.set("toolCalls", Value::from(tool_calls));
    builder.finish(file)
}
