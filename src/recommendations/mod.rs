//! Heuristic recommendations derived from the aggregation results

pub mod rules;

use serde::Serialize;

pub use rules::{Priority, RULES, Rule, RuleInputs};

use crate::analytics::{ConversationFlows, PromptingPatterns, TaskPatterns, ToolUsage};

/// At most this many recommendations are reported
pub const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: Priority,
    pub title: String,
    pub insight: String,
    pub action: String,
}

impl Recommendation {
    fn from_rule(rule: &Rule, inputs: &RuleInputs) -> Self {
        Self {
            id: rule.id.to_string(),
            kind: rule.kind.to_string(),
            priority: rule.priority,
            title: rule.title.to_string(),
            insight: (rule.insight)(inputs),
            action: rule.action.to_string(),
        }
    }
}

/// Evaluate every rule; high priority first, table order within a tier
pub fn evaluate(inputs: &RuleInputs) -> Vec<Recommendation> {
    let mut fired: Vec<Recommendation> = RULES
        .iter()
        .filter(|rule| (rule.trigger)(inputs))
        .map(|rule| Recommendation::from_rule(rule, inputs))
        .collect();
    fired.sort_by_key(|r| r.priority);
    fired.truncate(MAX_RECOMMENDATIONS);
    fired
}

pub fn recommend(
    tools: &ToolUsage,
    tasks: &TaskPatterns,
    prompting: &PromptingPatterns,
    flows: &ConversationFlows,
) -> Vec<Recommendation> {
    evaluate(&RuleInputs::from_analytics(tools, tasks, prompting, flows))
}
