use serde::Serialize;

use super::average;
use crate::models::{Conversation, MessageType, Platform, SourceKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMetric {
    pub conversation_id: String,
    pub platform: Platform,
    pub project: String,
    pub source_kind: SourceKind,
    pub message_count: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub tool_uses: usize,
    /// Last minus first message timestamp; 0 with fewer than two messages
    pub duration_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub average_messages: f64,
    pub average_duration_seconds: f64,
    /// Conversation with the most messages; the earliest listed wins ties
    pub longest_conversation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMetrics {
    pub conversations: Vec<ConversationMetric>,
    pub engagement: Engagement,
}

pub fn conversation_metrics(conversations: &[Conversation]) -> ConversationMetrics {
    let metrics: Vec<ConversationMetric> = conversations.iter().map(metric_for).collect();

    let total_messages: usize = metrics.iter().map(|m| m.message_count).sum();
    let total_duration: i64 = metrics.iter().map(|m| m.duration_seconds).sum();
    let longest = metrics
        .iter()
        .fold(None::<&ConversationMetric>, |best, m| match best {
            Some(b) if b.message_count >= m.message_count => Some(b),
            _ => Some(m),
        })
        .map(|m| m.conversation_id.clone());

    let engagement = Engagement {
        average_messages: average(total_messages as f64, metrics.len(), 1),
        average_duration_seconds: average(total_duration as f64, metrics.len(), 1),
        longest_conversation: longest,
    };

    ConversationMetrics { conversations: metrics, engagement }
}

fn metric_for(conversation: &Conversation) -> ConversationMetric {
    let duration_seconds = match (conversation.first_timestamp(), conversation.last_timestamp()) {
        (Some(first), Some(last)) if conversation.messages.len() >= 2 => {
            (last - first).num_seconds().max(0)
        }
        _ => 0,
    };

    ConversationMetric {
        conversation_id: conversation.conversation_id.clone(),
        platform: conversation.platform,
        project: conversation.project.clone(),
        source_kind: conversation.source_kind,
        message_count: conversation.messages.len(),
        user_messages: conversation.count_messages(MessageType::User),
        assistant_messages: conversation.count_messages(MessageType::Assistant),
        tool_uses: conversation.tool_use_count(),
        duration_seconds,
    }
}
