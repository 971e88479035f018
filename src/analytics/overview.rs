use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::average;
use crate::models::{Conversation, MessageType, Platform, SourceKind};

/// Headline totals across every loaded conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_conversations: usize,
    pub total_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub system_messages: usize,
    pub tool_uses: usize,
    pub main_sessions: usize,
    pub subagent_runs: usize,
    pub unique_projects: usize,
    pub unique_tools: usize,
    /// Conversation count per platform; every platform is listed
    pub by_platform: BTreeMap<String, usize>,
    pub first_activity: Option<DateTime<Utc>>,
    pub last_activity: Option<DateTime<Utc>>,
    pub average_messages_per_conversation: f64,
}

pub fn compute_overview(conversations: &[Conversation]) -> Overview {
    let mut by_platform: BTreeMap<String, usize> =
        Platform::ALL.iter().map(|p| (p.as_str().to_string(), 0)).collect();
    let mut projects = HashSet::new();
    let mut tools = HashSet::new();
    let mut overview = Overview {
        total_conversations: conversations.len(),
        total_messages: 0,
        user_messages: 0,
        assistant_messages: 0,
        system_messages: 0,
        tool_uses: 0,
        main_sessions: 0,
        subagent_runs: 0,
        unique_projects: 0,
        unique_tools: 0,
        by_platform: BTreeMap::new(),
        first_activity: None,
        last_activity: None,
        average_messages_per_conversation: 0.0,
    };

    for conversation in conversations {
        *by_platform.entry(conversation.platform.as_str().to_string()).or_default() += 1;
        projects.insert(conversation.project.as_str());

        match conversation.source_kind {
            SourceKind::Main => overview.main_sessions += 1,
            SourceKind::Subagent => overview.subagent_runs += 1,
        }

        for message in &conversation.messages {
            overview.total_messages += 1;
            match message.message_type {
                MessageType::User => overview.user_messages += 1,
                MessageType::Assistant => overview.assistant_messages += 1,
                MessageType::System => overview.system_messages += 1,
            }
            for tool in message.assistant_tool_names() {
                overview.tool_uses += 1;
                tools.insert(tool);
            }
        }

        if let Some(first) = conversation.first_timestamp() {
            overview.first_activity = Some(overview.first_activity.map_or(first, |f| f.min(first)));
        }
        if let Some(last) = conversation.last_timestamp() {
            overview.last_activity = Some(overview.last_activity.map_or(last, |l| l.max(last)));
        }
    }

    overview.unique_projects = projects.len();
    overview.unique_tools = tools.len();
    overview.by_platform = by_platform;
    overview.average_messages_per_conversation =
        average(overview.total_messages as f64, conversations.len(), 1);
    overview
}
