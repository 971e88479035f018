//! Recommendation rule table.
//!
//! Each rule is plain data: a trigger predicate over [`RuleInputs`] plus the
//! text shown when it fires. Thresholds live in the predicates below and in the
//! constants they reference.

use serde::Serialize;

use crate::analytics::{
    ConversationFlows, PromptingPatterns, TaskPattern, TaskPatterns, ToolUsage, exact_percentage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Figures the rules look at, extracted from the aggregation results
///
/// Ratios are computed from raw counts, never from the rounded display figures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleInputs {
    pub grep: usize,
    pub task: usize,
    pub todo_write: usize,
    pub read: usize,
    pub edit: usize,
    pub glob: usize,
    pub average_per_tool_turn: f64,
    /// Share of analyzed conversations with 16+ user turns, in percent
    pub long_conversation_pct: f64,
    /// Share of prompts under 50 characters, in percent
    pub short_prompt_pct: f64,
    /// Share of classified prompts that were debugging, in percent
    pub debugging_pct: f64,
}

impl RuleInputs {
    pub fn from_analytics(
        tools: &ToolUsage,
        tasks: &TaskPatterns,
        prompting: &PromptingPatterns,
        flows: &ConversationFlows,
    ) -> Self {
        Self {
            grep: tools.count("Grep"),
            task: tools.count("Task"),
            todo_write: tools.count("TodoWrite"),
            read: tools.count("Read"),
            edit: tools.count("Edit"),
            glob: tools.count("Glob"),
            average_per_tool_turn: tools.exact_average_per_tool_turn(),
            long_conversation_pct: exact_percentage(
                flows.distribution.long_conversations.count,
                flows.analyzed_conversations,
            ),
            short_prompt_pct: exact_percentage(
                prompting.distribution.short.count,
                prompting.total_prompts,
            ),
            debugging_pct: exact_percentage(
                tasks.get(TaskPattern::Debugging),
                tasks.classified(),
            ),
        }
    }
}

pub struct Rule {
    pub id: &'static str,
    pub kind: &'static str,
    pub priority: Priority,
    pub trigger: fn(&RuleInputs) -> bool,
    pub title: &'static str,
    pub insight: fn(&RuleInputs) -> String,
    pub action: &'static str,
}

pub const RULES: &[Rule] = &[
    Rule {
        id: "agent-search",
        kind: "tool-usage",
        priority: Priority::Medium,
        trigger: |i| i.grep > 50 && i.task < 10,
        title: "Delegate open-ended searches to a sub-agent",
        insight: |i| {
            format!("You ran Grep {} times but delegated only {} Task runs.", i.grep, i.task)
        },
        action: "Hand multi-step codebase searches to a Task sub-agent instead of chaining Grep calls.",
    },
    Rule {
        id: "task-tracking",
        kind: "workflow",
        priority: Priority::High,
        trigger: |i| i.long_conversation_pct > 30.0 && i.todo_write < 50,
        title: "Track long sessions with a todo list",
        insight: |i| {
            format!(
                "{:.1}% of conversations run 16+ turns, with {} TodoWrite calls overall.",
                i.long_conversation_pct, i.todo_write
            )
        },
        action: "Ask for a todo list at the start of long tasks so progress stays visible.",
    },
    Rule {
        id: "batch-reads",
        kind: "tool-usage",
        priority: Priority::Medium,
        trigger: |i| i.read > 100 && i.edit > 100 && (i.read as f64 / i.edit as f64) < 1.5,
        title: "Read more context before editing",
        insight: |i| format!("Reads ({}) barely outnumber edits ({}).", i.read, i.edit),
        action: "Have related files read together up front before making changes.",
    },
    Rule {
        id: "richer-prompts",
        kind: "prompting",
        priority: Priority::High,
        trigger: |i| i.short_prompt_pct > 40.0,
        title: "Give more context in prompts",
        insight: |i| format!("{:.1}% of your prompts are under 50 characters.", i.short_prompt_pct),
        action: "State the goal, the relevant files, and what done looks like in each request.",
    },
    Rule {
        id: "pattern-discovery",
        kind: "tool-usage",
        priority: Priority::Low,
        trigger: |i| i.read > 200 && i.glob < 50,
        title: "Locate files by pattern",
        insight: |i| format!("{} Read calls against only {} Glob calls.", i.read, i.glob),
        action: "Use Glob patterns to find candidate files before opening them one by one.",
    },
    Rule {
        id: "systematic-debugging",
        kind: "workflow",
        priority: Priority::Medium,
        trigger: |i| i.debugging_pct > 30.0,
        title: "Adopt a systematic debugging routine",
        insight: |i| format!("{:.1}% of classified tasks are debugging.", i.debugging_pct),
        action: "Start bug reports with a failing test or reproduction and the exact error output.",
    },
    Rule {
        id: "parallel-tools",
        kind: "tool-usage",
        priority: Priority::Low,
        trigger: |i| {
            i.average_per_tool_turn > 0.0
                && i.average_per_tool_turn < 1.5
                && i.grep + i.read > 100
        },
        title: "Batch independent tool calls",
        insight: |i| {
            format!("Tool turns average {:.2} calls each.", i.average_per_tool_turn)
        },
        action: "Ask for independent reads and searches to run in parallel in a single turn.",
    },
];
