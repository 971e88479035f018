//! Keyword classification of user prompts into task categories.
//!
//! The groups are tested in table order and the first group with any matching
//! substring wins. Keywords overlap between groups on purpose; the order is the
//! only tie-break.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::models::Conversation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskPattern {
    Debugging,
    FeatureImplementation,
    Testing,
    Refactoring,
    Update,
    Configuration,
    Documentation,
    CodeReview,
    Exploration,
    Question,
}

impl TaskPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPattern::Debugging => "debugging",
            TaskPattern::FeatureImplementation => "featureImplementation",
            TaskPattern::Testing => "testing",
            TaskPattern::Refactoring => "refactoring",
            TaskPattern::Update => "update",
            TaskPattern::Configuration => "configuration",
            TaskPattern::Documentation => "documentation",
            TaskPattern::CodeReview => "codeReview",
            TaskPattern::Exploration => "exploration",
            TaskPattern::Question => "question",
        }
    }

    fn index(self) -> usize {
        TASK_PATTERNS.iter().position(|(pattern, _)| *pattern == self).unwrap_or(0)
    }
}

/// Keyword groups in priority order
pub const TASK_PATTERNS: [(TaskPattern, &[&str]); 10] = [
    (
        TaskPattern::Debugging,
        &["fix", "bug", "error", "debug", "broken", "crash", "fail", "issue", "not working"],
    ),
    (
        TaskPattern::FeatureImplementation,
        &["add", "implement", "create", "build", "new feature", "need to", "make a"],
    ),
    (TaskPattern::Testing, &["test", "coverage", "assert", "mock"]),
    (
        TaskPattern::Refactoring,
        &["refactor", "clean up", "cleanup", "restructure", "simplify", "rename", "extract"],
    ),
    (TaskPattern::Update, &["update", "change", "modify", "upgrade", "bump", "replace"]),
    (
        TaskPattern::Configuration,
        &["config", "setup", "set up", "install", "environment", "settings", "deploy"],
    ),
    (TaskPattern::Documentation, &["document", "docs", "readme", "comment", "docstring"]),
    (TaskPattern::CodeReview, &["review", "check", "look at", "feedback", "audit"]),
    (
        TaskPattern::Exploration,
        &["find", "search", "where", "show me", "list", "explore", "understand"],
    ),
    (TaskPattern::Question, &["what", "how", "why", "can you", "could you", "?"]),
];

/// Classified prompt counts; every category is always present
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatterns {
    counts: [usize; TASK_PATTERNS.len()],
}

impl TaskPatterns {
    pub fn get(&self, pattern: TaskPattern) -> usize {
        self.counts[pattern.index()]
    }

    /// Prompts that matched any category
    pub fn classified(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskPattern, usize)> + '_ {
        TASK_PATTERNS.iter().zip(self.counts).map(|((pattern, _), count)| (*pattern, count))
    }

    fn record(&mut self, pattern: TaskPattern) {
        self.counts[pattern.index()] += 1;
    }
}

impl Serialize for TaskPatterns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (pattern, count) in self.iter() {
            map.serialize_entry(pattern.as_str(), &count)?;
        }
        map.end()
    }
}

/// First matching category for one prompt, if any
pub fn classify_prompt(prompt: &str) -> Option<TaskPattern> {
    let lowered = prompt.to_lowercase();
    TASK_PATTERNS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(pattern, _)| *pattern)
}

pub fn classify_tasks(conversations: &[Conversation]) -> TaskPatterns {
    let mut patterns = TaskPatterns::default();
    for prompt in conversations.iter().flat_map(|c| c.messages.iter()).filter_map(|m| m.user_prompt())
    {
        if let Some(pattern) = classify_prompt(prompt) {
            patterns.record(pattern);
        }
    }
    patterns
}
