//! Conversation builders for unit tests

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    ContentItem, Conversation, Message, MessageContent, MessageType, Metadata, Platform,
    SourceKind,
};

pub(crate) struct Fixture {
    conversation: Conversation,
    clock: DateTime<Utc>,
}

impl Fixture {
    pub fn new(id: &str, project: &str) -> Self {
        Self {
            conversation: Conversation {
                conversation_id: id.to_string(),
                project: project.to_string(),
                platform: Platform::ClaudeCode,
                source_kind: SourceKind::Main,
                parent_conversation_id: None,
                metadata: Metadata::new(),
                messages: Vec::new(),
            },
            clock: "2025-03-01T10:00:00Z".parse().unwrap(),
        }
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.conversation.platform = platform;
        self
    }

    pub fn subagent_of(mut self, parent: &str) -> Self {
        self.conversation.source_kind = SourceKind::Subagent;
        self.conversation.parent_conversation_id = Some(parent.to_string());
        self
    }

    pub fn starting_at(mut self, timestamp: &str) -> Self {
        self.clock = timestamp.parse().unwrap();
        self
    }

    pub fn metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        self.conversation.metadata.insert(key.to_string(), value);
        self
    }

    pub fn user(self, text: &str) -> Self {
        self.push(MessageType::User, MessageContent::Text(text.to_string()))
    }

    pub fn assistant(self, text: &str) -> Self {
        self.push(
            MessageType::Assistant,
            MessageContent::Items(vec![ContentItem::Text { text: text.to_string() }]),
        )
    }

    /// One assistant message invoking the given tools in order
    pub fn tools(self, names: &[&str]) -> Self {
        let items = names
            .iter()
            .map(|name| ContentItem::ToolUse { name: name.to_string(), id: None })
            .collect();
        self.push(MessageType::Assistant, MessageContent::Items(items))
    }

    pub fn tool_result(self) -> Self {
        self.push(
            MessageType::User,
            MessageContent::Items(vec![ContentItem::ToolResult { tool_use_id: None }]),
        )
    }

    pub fn system(self, text: &str) -> Self {
        self.push(MessageType::System, MessageContent::Text(text.to_string()))
    }

    fn push(mut self, message_type: MessageType, content: MessageContent) -> Self {
        self.conversation.messages.push(Message { message_type, timestamp: self.clock, content });
        self.clock += Duration::minutes(1);
        self
    }

    pub fn build(self) -> Conversation {
        self.conversation
    }
}
