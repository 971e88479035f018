use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Conversation, MessageType, SourceKind};

/// Activity of one UTC calendar day, with running totals up to and including it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayActivity {
    pub date: NaiveDate,
    pub sessions: usize,
    pub subagents: usize,
    pub conversations: usize,
    /// User and assistant messages
    pub chat_messages: usize,
    pub tool_uses: usize,
    /// Every message, system ones included
    pub events: usize,
    pub cumulative_sessions: usize,
    pub cumulative_subagents: usize,
    pub cumulative_conversations: usize,
    pub cumulative_chat_messages: usize,
    pub cumulative_tool_uses: usize,
    pub cumulative_events: usize,
}

impl DayActivity {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            sessions: 0,
            subagents: 0,
            conversations: 0,
            chat_messages: 0,
            tool_uses: 0,
            events: 0,
            cumulative_sessions: 0,
            cumulative_subagents: 0,
            cumulative_conversations: 0,
            cumulative_chat_messages: 0,
            cumulative_tool_uses: 0,
            cumulative_events: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Chronological; days without activity are omitted
    pub by_day: Vec<DayActivity>,
}

#[derive(Debug, Default)]
struct RunningTotals {
    sessions: usize,
    subagents: usize,
    conversations: usize,
    chat_messages: usize,
    tool_uses: usize,
    events: usize,
}

/// Bucket conversations by the UTC day of their first message
pub fn build_timeline(conversations: &[Conversation]) -> Timeline {
    let mut days: BTreeMap<NaiveDate, DayActivity> = BTreeMap::new();

    for conversation in conversations {
        let Some(first) = conversation.first_timestamp() else {
            continue;
        };
        let date = first.date_naive();
        let day = days.entry(date).or_insert_with(|| DayActivity::new(date));

        day.conversations += 1;
        match conversation.source_kind {
            SourceKind::Main => day.sessions += 1,
            SourceKind::Subagent => day.subagents += 1,
        }
        day.events += conversation.messages.len();
        day.chat_messages += conversation.messages.len()
            - conversation.count_messages(MessageType::System);
        day.tool_uses += conversation.tool_use_count();
    }

    let mut running = RunningTotals::default();
    let by_day = days
        .into_values()
        .map(|mut day| {
            running.sessions += day.sessions;
            running.subagents += day.subagents;
            running.conversations += day.conversations;
            running.chat_messages += day.chat_messages;
            running.tool_uses += day.tool_uses;
            running.events += day.events;

            day.cumulative_sessions = running.sessions;
            day.cumulative_subagents = running.subagents;
            day.cumulative_conversations = running.conversations;
            day.cumulative_chat_messages = running.chat_messages;
            day.cumulative_tool_uses = running.tool_uses;
            day.cumulative_events = running.events;
            day
        })
        .collect();

    Timeline { by_day }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::Fixture;

    #[test]
    fn test_timeline_buckets_and_cumulative_totals() {
        let conversations = vec![
            Fixture::new("b", "p")
                .starting_at("2025-03-03T23:59:30Z")
                .user("late")
                .tools(&["Read", "Edit"])
                .build(),
            Fixture::new("a", "p").starting_at("2025-03-01T10:00:00Z").user("x").system("s").build(),
            Fixture::new("c", "p")
                .subagent_of("b")
                .starting_at("2025-03-03T12:00:00Z")
                .tools(&["Grep"])
                .build(),
        ];

        let timeline = build_timeline(&conversations);
        assert_eq!(timeline.by_day.len(), 2);

        let first = &timeline.by_day[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(first.sessions, 1);
        assert_eq!(first.chat_messages, 1);
        assert_eq!(first.events, 2);

        // the late conversation spills past midnight but stays on its first day
        let second = &timeline.by_day[1];
        assert_eq!(second.date, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(second.sessions, 1);
        assert_eq!(second.subagents, 1);
        assert_eq!(second.conversations, 2);
        assert_eq!(second.tool_uses, 3);
        assert_eq!(second.cumulative_conversations, 3);
        assert_eq!(second.cumulative_events, 5);
        assert_eq!(second.cumulative_chat_messages, 4);
    }

    #[test]
    fn test_day_serializes_as_calendar_date() {
        let conversations =
            vec![Fixture::new("a", "p").starting_at("2025-03-01T10:00:00Z").user("x").build()];
        let json = serde_json::to_value(build_timeline(&conversations)).unwrap();
        assert_eq!(json["byDay"][0]["date"], "2025-03-01");
        assert_eq!(json["byDay"][0]["cumulativeSessions"], 1);
    }
}
