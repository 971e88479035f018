use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Conversation, Platform};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectActivity {
    pub project: String,
    pub conversations: usize,
    pub messages: usize,
    pub tool_uses: usize,
    pub platforms: BTreeSet<Platform>,
    pub first_activity: Option<DateTime<Utc>>,
    pub last_activity: Option<DateTime<Utc>>,
}

impl ProjectActivity {
    fn new(project: &str) -> Self {
        Self {
            project: project.to_string(),
            conversations: 0,
            messages: 0,
            tool_uses: 0,
            platforms: BTreeSet::new(),
            first_activity: None,
            last_activity: None,
        }
    }
}

/// Per-project activity, busiest first (by messages, then by name)
pub fn project_activity(conversations: &[Conversation]) -> Vec<ProjectActivity> {
    let mut by_project: HashMap<&str, ProjectActivity> = HashMap::new();

    for conversation in conversations {
        let entry = by_project
            .entry(conversation.project.as_str())
            .or_insert_with(|| ProjectActivity::new(&conversation.project));
        entry.conversations += 1;
        entry.messages += conversation.messages.len();
        entry.tool_uses += conversation.tool_use_count();
        entry.platforms.insert(conversation.platform);

        if let Some(first) = conversation.first_timestamp() {
            entry.first_activity = Some(entry.first_activity.map_or(first, |f| f.min(first)));
        }
        if let Some(last) = conversation.last_timestamp() {
            entry.last_activity = Some(entry.last_activity.map_or(last, |l| l.max(last)));
        }
    }

    let mut projects: Vec<ProjectActivity> = by_project.into_values().collect();
    projects.sort_by(|a, b| b.messages.cmp(&a.messages).then_with(|| a.project.cmp(&b.project)));
    projects
}
