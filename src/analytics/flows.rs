use serde::Serialize;

use super::{average, percentage};
use crate::models::Conversation;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowBucket {
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDistribution {
    /// 1 user turn
    pub single_turn: FlowBucket,
    /// 2-5 user turns
    pub short_conversations: FlowBucket,
    /// 6-15 user turns
    pub medium_conversations: FlowBucket,
    /// 16 or more user turns
    pub long_conversations: FlowBucket,
}

/// Conversation lengths measured in user turns
///
/// Conversations with no user turn (tool-only subagent runs, metadata-only
/// files) are left out of every bucket and of the average.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationFlows {
    pub distribution: FlowDistribution,
    pub analyzed_conversations: usize,
    pub average_turns: f64,
}

pub fn analyze_flows(conversations: &[Conversation]) -> ConversationFlows {
    let mut distribution = FlowDistribution::default();
    let mut analyzed = 0usize;
    let mut total_turns = 0usize;

    for turns in conversations.iter().map(Conversation::user_turns).filter(|t| *t > 0) {
        analyzed += 1;
        total_turns += turns;
        let bucket = match turns {
            1 => &mut distribution.single_turn,
            2..=5 => &mut distribution.short_conversations,
            6..=15 => &mut distribution.medium_conversations,
            _ => &mut distribution.long_conversations,
        };
        bucket.count += 1;
    }

    for bucket in [
        &mut distribution.single_turn,
        &mut distribution.short_conversations,
        &mut distribution.medium_conversations,
        &mut distribution.long_conversations,
    ] {
        bucket.percentage = percentage(bucket.count, analyzed);
    }

    ConversationFlows {
        distribution,
        analyzed_conversations: analyzed,
        average_turns: average(total_turns as f64, analyzed, 1),
    }
}
