use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use super::{ConversationBuilder, content_shape, extract_text};
use crate::models::{ContentItem, Conversation, MessageContent, MessageType, SourceFile};
use crate::parsers::claude::{ClaudeBlock, ClaudeRecord, ClaudeTurn};
use crate::parsers::{JsonLines, read_json_lines, record_type};

pub fn normalize_claude_file(file: &SourceFile) -> Result<Conversation> {
    let lines = read_json_lines(&file.path)?;
    Ok(normalize_claude_records(file, lines))
}

/// Build a conversation from parsed Claude Code session records
pub fn normalize_claude_records(file: &SourceFile, lines: JsonLines) -> Conversation {
    let mut builder = ConversationBuilder::new(file, file.stem());
    if lines.skipped > 0 {
        builder.set("skippedLines", Value::from(lines.skipped));
    }

    for value in lines.records {
        builder.bump("recordTypes", record_type(&value));

        let record = match ClaudeRecord::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                debug!("Skipping malformed record in {}: {}", file.path.display(), e);
                continue;
            }
        };

        builder.observe_cwd(record.cwd());
        builder.observe_parent(record.session_id());

        match record {
            ClaudeRecord::User(turn) => push_turn(&mut builder, turn, MessageType::User),
            ClaudeRecord::Assistant(turn) => push_turn(&mut builder, turn, MessageType::Assistant),
            ClaudeRecord::System(entry) => {
                if let Some(text) = extract_text(&entry.content) {
                    builder.push(MessageType::System, entry.timestamp, MessageContent::Text(text));
                }
            }
            ClaudeRecord::Summary | ClaudeRecord::FileHistorySnapshot | ClaudeRecord::Unknown(_) => {
            }
        }
    }

    builder.finish(file)
}

fn push_turn(builder: &mut ConversationBuilder, turn: ClaudeTurn, role: MessageType) {
    if let Some(branch) = turn.git_branch.as_deref() {
        builder.set_once("gitBranch", branch);
    }
    if let Some(version) = turn.version.as_deref() {
        builder.set_once("version", version);
    }

    let Some(message) = turn.message else {
        builder.bump("contentShapes", "absent");
        return;
    };
    builder.bump("contentShapes", content_shape(&message.content));

    // Injected context (command output, reminders) is not something the user typed
    let message_type = if role == MessageType::User && turn.is_meta { MessageType::System } else { role };

    let content = match (&message.content, role) {
        (Value::String(text), MessageType::Assistant) => {
            let text = text.trim();
            if text.is_empty() {
                return;
            }
            MessageContent::Items(vec![ContentItem::Text { text: text.to_string() }])
        }
        (Value::String(text), _) => {
            let text = text.trim();
            if text.is_empty() {
                return;
            }
            MessageContent::Text(text.to_string())
        }
        (Value::Array(blocks), MessageType::Assistant) => {
            let items = convert_blocks(blocks);
            if items.is_empty() {
                return;
            }
            MessageContent::Items(items)
        }
        (Value::Array(blocks), _) => {
            let items = convert_blocks(blocks);
            match collapse_text(&items) {
                Some(text) => MessageContent::Text(text),
                None if items.is_empty() => return,
                None => MessageContent::Items(items),
            }
        }
        _ => return,
    };

    builder.push(message_type, turn.timestamp, content);
}

fn convert_blocks(blocks: &[Value]) -> Vec<ContentItem> {
    blocks
        .iter()
        .filter_map(|block| match ClaudeBlock::from_value(block) {
            ClaudeBlock::Text { text } => {
                let text = text.trim();
                (!text.is_empty()).then(|| ContentItem::Text { text: text.to_string() })
            }
            ClaudeBlock::ToolUse { name, id } | ClaudeBlock::ServerToolUse { name, id } => {
                Some(ContentItem::ToolUse { name, id })
            }
            ClaudeBlock::ToolResult { tool_use_id } => Some(ContentItem::ToolResult { tool_use_id }),
            ClaudeBlock::Thinking | ClaudeBlock::RedactedThinking => Some(ContentItem::Thinking {}),
            ClaudeBlock::Other => None,
        })
        .collect()
}

/// Join a text-only block list into one prompt string
fn collapse_text(items: &[ContentItem]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        match item {
            ContentItem::Text { text } => parts.push(text.as_str()),
            _ => return None,
        }
    }
    Some(parts.join("\n"))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use crate::models::{METADATA_ONLY_TEXT, Platform, SourceKind, UNKNOWN_PROJECT};
    use crate::parsers::parse_json_lines;

    use super::*;

    fn main_file() -> SourceFile {
        SourceFile::main(
            PathBuf::from("/nonexistent/projects/-Users-dev-webapp/11111111-2222.jsonl"),
            Platform::ClaudeCode,
        )
        .with_project_hint("Users-dev-webapp")
    }

    fn normalize(file: &SourceFile, content: &str) -> Conversation {
        normalize_claude_records(file, parse_json_lines(content, Path::new("test")))
    }

    const SESSION: &str = r#"{"type":"summary","summary":"Login fix","leafUuid":"x"}
{"type":"user","message":{"role":"user","content":"fix the login bug"},"timestamp":"2025-03-01T10:00:00Z","sessionId":"11111111-2222","cwd":"/Users/dev/webapp","gitBranch":"main","version":"1.0.80"}
{"type":"assistant","message":{"role":"assistant","content":[{"type":"thinking","thinking":"..."},{"type":"text","text":"Looking."},{"type":"tool_use","id":"t1","name":"Read","input":{}}]},"timestamp":"2025-03-01T10:00:05Z","sessionId":"11111111-2222"}
{"type":"user","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"t1","content":"file body"}]},"timestamp":"2025-03-01T10:00:06Z","sessionId":"11111111-2222"}
{"type":"user","message":{"role":"user","content":[{"type":"text","text":"now add tests"},{"type":"image","source":{}}]},"timestamp":"2025-03-01T10:01:00Z","sessionId":"11111111-2222"}
{"type":"user","isMeta":true,"message":{"role":"user","content":"<command-message>init</command-message>"},"timestamp":"2025-03-01T10:01:01Z"}
{"type":"file-history-snapshot","messageId":"m","snapshot":{}}
not json"#;

    #[test]
    fn test_normalize_session_messages() {
        let conversation = normalize(&main_file(), SESSION);

        assert_eq!(conversation.conversation_id, "11111111-2222");
        assert_eq!(conversation.project, "webapp");
        assert_eq!(conversation.platform, Platform::ClaudeCode);
        assert_eq!(conversation.source_kind, SourceKind::Main);
        assert_eq!(conversation.messages.len(), 5);

        let types: Vec<_> = conversation.messages.iter().map(|m| m.message_type).collect();
        assert_eq!(
            types,
            vec![
                MessageType::User,
                MessageType::Assistant,
                MessageType::User,
                MessageType::User,
                MessageType::System
            ]
        );

        assert_eq!(conversation.messages[0].text(), Some("fix the login bug"));
        assert_eq!(conversation.messages[1].tool_names().collect::<Vec<_>>(), vec!["Read"]);
        // tool results stay structured, so they are not prompts
        assert_eq!(conversation.messages[2].text(), None);
        // unknown image block dropped, remaining text collapses to a prompt
        assert_eq!(conversation.messages[3].text(), Some("now add tests"));
    }

    #[test]
    fn test_normalize_session_metadata() {
        let conversation = normalize(&main_file(), SESSION);
        let metadata = &conversation.metadata;

        assert_eq!(metadata["recordTypes"]["user"], 4);
        assert_eq!(metadata["recordTypes"]["summary"], 1);
        assert_eq!(metadata["recordTypes"]["file-history-snapshot"], 1);
        assert_eq!(metadata["contentShapes"]["string"], 2);
        assert_eq!(metadata["contentShapes"]["list"], 3);
        assert_eq!(metadata["gitBranch"], "main");
        assert_eq!(metadata["version"], "1.0.80");
        assert_eq!(metadata["skippedLines"], 1);
    }

    #[test]
    fn test_timestamps_non_decreasing() {
        let content = r#"{"type":"user","message":{"role":"user","content":"a"},"timestamp":"2025-03-01T10:00:00Z"}
{"type":"assistant","message":{"role":"assistant","content":"b"},"timestamp":"2025-03-01T09:00:00Z"}
{"type":"user","message":{"role":"user","content":"c"}}"#;
        let conversation = normalize(&main_file(), content);

        let stamps: Vec<_> = conversation.messages.iter().map(|m| m.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(conversation.messages[1].tool_names().count(), 0);
    }

    #[test]
    fn test_metadata_only_session_gets_placeholder() {
        let content = r#"{"type":"summary","summary":"x"}
{"type":"file-history-snapshot","snapshot":{}}"#;
        let conversation = normalize(&main_file(), content);

        assert_eq!(conversation.messages.len(), 1);
        assert_eq!(conversation.messages[0].message_type, MessageType::System);
        assert_eq!(conversation.messages[0].text(), Some(METADATA_ONLY_TEXT));
        assert_eq!(conversation.project, "Users-dev-webapp");
    }

    #[test]
    fn test_empty_file_without_hint_is_unknown_project() {
        let file = SourceFile::main(PathBuf::from("/nonexistent/s.jsonl"), Platform::ClaudeCode);
        let conversation = normalize(&file, "");
        assert_eq!(conversation.messages.len(), 1);
        assert_eq!(conversation.project, UNKNOWN_PROJECT);
    }

    #[test]
    fn test_legacy_agent_file_takes_parent_from_records() {
        let file = SourceFile {
            path: PathBuf::from("/nonexistent/agent-a1b2.jsonl"),
            platform: Platform::ClaudeCode,
            kind: SourceKind::Subagent,
            parent_id: None,
            project_hint: None,
        };
        let content = r#"{"type":"user","message":{"role":"user","content":"search for auth"},"sessionId":"parent-session","isSidechain":true}"#;
        let conversation = normalize(&file, content);

        assert_eq!(conversation.conversation_id, "agent-a1b2");
        assert_eq!(conversation.source_kind, SourceKind::Subagent);
        assert_eq!(conversation.parent_conversation_id.as_deref(), Some("parent-session"));
    }

    #[test]
    fn test_directory_parent_wins_over_records() {
        let file = SourceFile {
            path: PathBuf::from("/nonexistent/sess/subagents/agent-1.jsonl"),
            platform: Platform::ClaudeCode,
            kind: SourceKind::Subagent,
            parent_id: Some("sess".to_string()),
            project_hint: None,
        };
        let content = r#"{"type":"user","message":{"role":"user","content":"x"},"sessionId":"other"}"#;
        let conversation = normalize(&file, content);
        assert_eq!(conversation.parent_conversation_id.as_deref(), Some("sess"));
    }

    #[test]
    fn test_main_session_never_gets_parent() {
        let conversation = normalize(&main_file(), SESSION);
        assert!(conversation.parent_conversation_id.is_none());
    }
}
