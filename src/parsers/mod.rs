//! Raw log readers for the supported transcript formats
//!
//! # Error Handling Strategy
//!
//! This module follows a **graceful degradation** approach:
//!
//! - **Individual line failures**: Malformed JSON lines are logged with `tracing::warn!`
//!   and skipped. A file with bad lines still yields whatever records it has.
//!
//! - **File failures**: Only opening or reading a file returns an error. Callers log it and
//!   skip that one file; a scan never aborts because of a single transcript.
//!
//! - **Record classification**: Records are classified into closed enums per format
//!   ([`claude::ClaudeRecord`], [`codex::CodexRecord`], [`cursor::TranscriptBlock`]).
//!   Unknown discriminators land in an explicit `Unknown`/`Other` variant instead of
//!   being dropped silently, so the normalizer can still count them.

pub mod claude;
pub mod codex;
pub mod cursor;
pub mod deserializers;
pub mod jsonl;

pub use claude::ClaudeRecord;
pub use codex::{CodexLine, CodexRecord, ResponseItem};
pub use cursor::{TranscriptBlock, TranscriptRole, parse_transcript, read_transcript_blocks};
pub use jsonl::{JsonLines, parse_json_lines, read_json_lines, record_type};
