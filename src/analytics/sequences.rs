use std::collections::HashMap;

use serde::Serialize;

use crate::models::Conversation;

const TOP_SEQUENCES: usize = 10;

/// Adjacent tool pair `from → to` and how often it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSequence {
    pub sequence: String,
    pub from: String,
    pub to: String,
    pub count: usize,
}

/// Most frequent adjacent tool pairs within conversations
///
/// Pairs never span two conversations. Ties keep the order in which the pair
/// was first seen.
pub fn tool_sequences(conversations: &[Conversation]) -> Vec<ToolSequence> {
    let mut positions: HashMap<(&str, &str), usize> = HashMap::new();
    let mut pairs: Vec<((&str, &str), usize)> = Vec::new();

    for conversation in conversations {
        let tools = conversation.tool_sequence();
        for window in tools.windows(2) {
            let key = (window[0], window[1]);
            match positions.get(&key) {
                Some(&index) => pairs[index].1 += 1,
                None => {
                    positions.insert(key, pairs.len());
                    pairs.push((key, 1));
                }
            }
        }
    }

    pairs.sort_by(|a, b| b.1.cmp(&a.1));
    pairs
        .into_iter()
        .take(TOP_SEQUENCES)
        .map(|((from, to), count)| ToolSequence {
            sequence: format!("{from} → {to}"),
            from: from.to_string(),
            to: to.to_string(),
            count,
        })
        .collect()
}
