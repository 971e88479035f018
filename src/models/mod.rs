//! Data models for normalized assistant transcripts.
//!
//! - [`Conversation`] - one normalized session or subagent run
//! - [`Message`] / [`ContentItem`] - ordered turns and their content units
//! - [`SourceFile`] - a discovered transcript file awaiting normalization
//! - [`ProjectInfo`] - a Claude Code project directory and its transcripts
//!
//! Every model serializes with the camelCase field names used by the JSON output.

pub mod conversation;
pub mod project;
pub mod source;

pub use conversation::{
    ContentItem, Conversation, METADATA_ONLY_TEXT, Message, MessageContent, MessageType, Metadata,
    Platform, SourceKind, UNKNOWN_PROJECT,
};
pub use project::{ProjectInfo, SubagentFile};
pub use source::SourceFile;
