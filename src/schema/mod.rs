//! Structural profile of normalized conversations per source.
//!
//! Only field names and shapes are inspected, never message text. Field names
//! are taken from the serialized JSON form, so the profile describes exactly
//! what the `summary` output would contain.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::models::{Conversation, Platform};
use crate::normalizer::content_shape;

/// Field frequencies for one platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSchema {
    pub conversations: usize,
    pub messages: usize,
    pub conversation_fields: BTreeMap<String, usize>,
    pub metadata_fields: BTreeMap<String, usize>,
    pub message_fields: BTreeMap<String, usize>,
    pub message_types: BTreeMap<String, usize>,
    pub content_shapes: BTreeMap<String, usize>,
    pub content_item_types: BTreeMap<String, usize>,
    pub tool_names: BTreeMap<String, usize>,
}

impl SourceSchema {
    /// Qualified names of every field seen: `conversation.<k>`, `metadata.<k>`, `message.<k>`
    pub fn qualified_fields(&self) -> BTreeSet<String> {
        let conversation = self.conversation_fields.keys().map(|k| format!("conversation.{k}"));
        let metadata = self.metadata_fields.keys().map(|k| format!("metadata.{k}"));
        let message = self.message_fields.keys().map(|k| format!("message.{k}"));
        conversation.chain(metadata).chain(message).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaProfile {
    /// Keyed by platform id; only platforms with at least one conversation
    pub sources: BTreeMap<String, SourceSchema>,
    /// Fields seen for exactly one profiled platform
    pub unique_fields: BTreeMap<String, BTreeSet<String>>,
}

pub fn profile_schema(conversations: &[Conversation]) -> SchemaProfile {
    let mut by_platform: BTreeMap<Platform, SourceSchema> = BTreeMap::new();

    for conversation in conversations {
        let schema = by_platform.entry(conversation.platform).or_default();
        if let Err(e) = profile_conversation(schema, conversation) {
            debug!("Skipping schema profile of {}: {}", conversation.conversation_id, e);
        }
    }

    let fields: BTreeMap<Platform, BTreeSet<String>> =
        by_platform.iter().map(|(platform, schema)| (*platform, schema.qualified_fields())).collect();

    let unique_fields: BTreeMap<String, BTreeSet<String>> = fields
        .iter()
        .map(|(platform, own)| {
            let unique: BTreeSet<String> = own
                .iter()
                .filter(|field| {
                    fields
                        .iter()
                        .filter(|(other, _)| *other != platform)
                        .all(|(_, theirs)| !theirs.contains(*field))
                })
                .cloned()
                .collect();
            (platform.as_str().to_string(), unique)
        })
        .collect();

    let sources = by_platform
        .into_iter()
        .map(|(platform, schema)| (platform.as_str().to_string(), schema))
        .collect();

    SchemaProfile { sources, unique_fields }
}

fn profile_conversation(
    schema: &mut SourceSchema,
    conversation: &Conversation,
) -> Result<(), serde_json::Error> {
    let value = serde_json::to_value(conversation)?;
    schema.conversations += 1;

    if let Value::Object(map) = &value {
        for key in map.keys() {
            bump(&mut schema.conversation_fields, key);
        }
    }
    for key in conversation.metadata.keys() {
        bump(&mut schema.metadata_fields, key);
    }

    let messages = value.get("messages").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);
    for message in messages {
        schema.messages += 1;
        if let Value::Object(map) = message {
            for key in map.keys() {
                bump(&mut schema.message_fields, key);
            }
        }
        if let Some(message_type) = message.get("type").and_then(Value::as_str) {
            bump(&mut schema.message_types, message_type);
        }

        let content = message.get("content").unwrap_or(&Value::Null);
        bump(&mut schema.content_shapes, content_shape(content));
        for item in content.as_array().map(Vec::as_slice).unwrap_or(&[]) {
            if let Some(item_type) = item.get("type").and_then(Value::as_str) {
                bump(&mut schema.content_item_types, item_type);
            }
        }
    }

    for message in &conversation.messages {
        for tool in message.tool_names() {
            bump(&mut schema.tool_names, tool);
        }
    }

    Ok(())
}

fn bump(counts: &mut BTreeMap<String, usize>, key: &str) {
    *counts.entry(key.to_string()).or_default() += 1;
}
