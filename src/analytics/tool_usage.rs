use std::collections::BTreeMap;

use serde::Serialize;

use super::round_to;
use crate::models::{Conversation, MessageType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCount {
    pub name: String,
    pub count: usize,
}

/// Tool invocation histograms; only `tool_use` items in assistant messages count
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolUsage {
    pub overall: BTreeMap<String, usize>,
    pub by_project: BTreeMap<String, BTreeMap<String, usize>>,
    /// Descending by count, then by name
    pub ranked: Vec<ToolCount>,
    pub total_tool_uses: usize,
    /// Assistant messages that used at least one tool
    #[serde(skip)]
    pub tool_turns: usize,
    /// Tool uses per assistant message that used at least one tool
    pub average_per_tool_turn: f64,
}

impl ToolUsage {
    pub fn count(&self, tool: &str) -> usize {
        self.overall.get(tool).copied().unwrap_or(0)
    }

    /// Unrounded tool uses per tool turn
    pub fn exact_average_per_tool_turn(&self) -> f64 {
        if self.tool_turns == 0 {
            return 0.0;
        }
        self.total_tool_uses as f64 / self.tool_turns as f64
    }
}

pub fn analyze_tool_usage(conversations: &[Conversation]) -> ToolUsage {
    let mut overall: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_project: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    let mut total = 0usize;
    let mut tool_turns = 0usize;

    for conversation in conversations {
        for message in &conversation.messages {
            if message.message_type != MessageType::Assistant {
                continue;
            }
            let mut used_tool = false;
            for tool in message.assistant_tool_names() {
                used_tool = true;
                total += 1;
                *overall.entry(tool.to_string()).or_default() += 1;
                *by_project
                    .entry(conversation.project.clone())
                    .or_default()
                    .entry(tool.to_string())
                    .or_default() += 1;
            }
            if used_tool {
                tool_turns += 1;
            }
        }
    }

    let mut ranked: Vec<ToolCount> =
        overall.iter().map(|(name, count)| ToolCount { name: name.clone(), count: *count }).collect();
    // BTreeMap order already breaks ties by name; the sort is stable
    ranked.sort_by(|a, b| b.count.cmp(&a.count));

    let average_per_tool_turn =
        if tool_turns == 0 { 0.0 } else { round_to(total as f64 / tool_turns as f64, 2) };

    ToolUsage {
        overall,
        by_project,
        ranked,
        total_tool_uses: total,
        tool_turns,
        average_per_tool_turn,
    }
}
