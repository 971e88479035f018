use serde::Serialize;

use super::{average, percentage};
use crate::models::Conversation;

/// Prompts shorter than this many characters are short
pub const SHORT_PROMPT_CHARS: usize = 50;
/// Prompts at least this many characters long are long
pub const LONG_PROMPT_CHARS: usize = 200;

const MAX_EXAMPLES: usize = 3;
const EXAMPLE_CHARS: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PromptBucket {
    pub count: usize,
    pub percentage: f64,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PromptDistribution {
    pub short: PromptBucket,
    pub medium: PromptBucket,
    pub long: PromptBucket,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptingPatterns {
    pub distribution: PromptDistribution,
    pub total_prompts: usize,
    /// Mean prompt length in characters
    pub average_length: f64,
}

pub fn analyze_prompting(conversations: &[Conversation]) -> PromptingPatterns {
    let mut distribution = PromptDistribution::default();
    let mut total = 0usize;
    let mut total_chars = 0usize;

    for prompt in conversations.iter().flat_map(|c| c.messages.iter()).filter_map(|m| m.user_prompt())
    {
        let chars = prompt.chars().count();
        total += 1;
        total_chars += chars;

        let (bucket, is_long) = if chars < SHORT_PROMPT_CHARS {
            (&mut distribution.short, false)
        } else if chars < LONG_PROMPT_CHARS {
            (&mut distribution.medium, false)
        } else {
            (&mut distribution.long, true)
        };

        bucket.count += 1;
        if bucket.examples.len() < MAX_EXAMPLES {
            bucket.examples.push(example(prompt, is_long));
        }
    }

    for bucket in [&mut distribution.short, &mut distribution.medium, &mut distribution.long] {
        bucket.percentage = percentage(bucket.count, total);
    }

    PromptingPatterns {
        distribution,
        total_prompts: total,
        average_length: average(total_chars as f64, total, 1),
    }
}

fn example(prompt: &str, is_long: bool) -> String {
    let mut text: String = prompt.chars().take(EXAMPLE_CHARS).collect();
    if is_long {
        text.push_str("...");
    }
    text
}
