//! Aggregation passes over normalized conversations.
//!
//! Every pass is a pure function of `&[Conversation]`. Passes share no state,
//! so [`compute_summary`] is free to run them in any order; the two independent
//! halves are joined on the rayon pool.
//!
//! Percentages are rounded to one decimal place and are `0.0` when the
//! denominator is empty. Rounding is for display only; recommendation
//! thresholds are checked against the raw counts.

pub mod flows;
pub mod metrics;
pub mod overview;
pub mod projects;
pub mod prompting;
pub mod sequences;
pub mod task_patterns;
pub mod timeline;
pub mod tool_usage;

#[cfg(test)]
pub(crate) mod fixtures;

use serde::Serialize;

pub use flows::{ConversationFlows, FlowBucket, FlowDistribution, analyze_flows};
pub use metrics::{ConversationMetric, ConversationMetrics, Engagement, conversation_metrics};
pub use overview::{Overview, compute_overview};
pub use projects::{ProjectActivity, project_activity};
pub use prompting::{PromptBucket, PromptDistribution, PromptingPatterns, analyze_prompting};
pub use sequences::{ToolSequence, tool_sequences};
pub use task_patterns::{TASK_PATTERNS, TaskPattern, TaskPatterns, classify_prompt, classify_tasks};
pub use timeline::{DayActivity, Timeline, build_timeline};
pub use tool_usage::{ToolCount, ToolUsage, analyze_tool_usage};

use crate::models::Conversation;
use crate::recommendations::{Recommendation, recommend};

/// Everything the summary command reports, recomputed wholesale per generation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub overview: Overview,
    pub tool_usage: ToolUsage,
    pub conversation_metrics: ConversationMetrics,
    pub task_patterns: TaskPatterns,
    pub prompting_patterns: PromptingPatterns,
    pub conversation_flows: ConversationFlows,
    pub tool_sequences: Vec<ToolSequence>,
    pub project_activity: Vec<ProjectActivity>,
    pub timeline: Timeline,
    pub recommendations: Vec<Recommendation>,
}

/// Run every aggregation pass and derive recommendations from the result
pub fn compute_summary(conversations: &[Conversation]) -> AnalyticsSummary {
    let (
        (overview, tool_usage, conversation_metrics, project_activity, timeline),
        (task_patterns, prompting_patterns, conversation_flows, tool_sequences),
    ) = rayon::join(
        || {
            (
                compute_overview(conversations),
                analyze_tool_usage(conversations),
                conversation_metrics(conversations),
                project_activity(conversations),
                build_timeline(conversations),
            )
        },
        || {
            (
                classify_tasks(conversations),
                analyze_prompting(conversations),
                analyze_flows(conversations),
                tool_sequences(conversations),
            )
        },
    );

    let recommendations =
        recommend(&tool_usage, &task_patterns, &prompting_patterns, &conversation_flows);

    AnalyticsSummary {
        overview,
        tool_usage,
        conversation_metrics,
        task_patterns,
        prompting_patterns,
        conversation_flows,
        tool_sequences,
        project_activity,
        timeline,
        recommendations,
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Unrounded `part / total` in percent, `0.0` for an empty total
pub(crate) fn exact_percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / total as f64
}

/// `part / total` as a percentage with one decimal, `0.0` for an empty total
pub(crate) fn percentage(part: usize, total: usize) -> f64 {
    round_to(exact_percentage(part, total), 1)
}

/// Mean rounded to `decimals`, `0.0` when there is nothing to average
pub(crate) fn average(sum: f64, count: usize, decimals: i32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round_to(sum / count as f64, decimals)
}
