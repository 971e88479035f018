//! Cursor agent transcripts.
//!
//! Plain text where a bare `user:` or `assistant:` line opens a block that runs
//! until the next sentinel. Assistant blocks mark tool invocations with
//! `[Tool call] <name>` lines and their output with `[Tool result]` lines.
//!
//! Indented lines directly below either marker are the call's arguments or
//! the tool's output, so they are dropped along with the marker. This includes
//! any indented prose or code the assistant writes right after a tool result;
//! the first unindented line ends the tool section and is kept as text.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::utils::read_transcript;

static TOOL_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[Tool call\]\s+([^\s(]+)").expect("tool call pattern is valid")
});

const TOOL_CALL_PREFIX: &str = "[Tool call]";
const TOOL_RESULT_PREFIX: &str = "[Tool result]";

/// Wrapper tags Cursor puts around injected context and the user's query
const WRAPPER_TAGS: &[&str] = &["<user_query>", "</user_query>", "<user_info>", "</user_info>"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptRole {
    User,
    Assistant,
}

impl TranscriptRole {
    fn from_sentinel(line: &str) -> Option<Self> {
        match line.trim() {
            "user:" => Some(TranscriptRole::User),
            "assistant:" => Some(TranscriptRole::Assistant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptRole::User => "user",
            TranscriptRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptBlock {
    pub role: TranscriptRole,
    /// Residual free-text lines, wrapper tags removed
    pub lines: Vec<String>,
    /// Tool names in invocation order
    pub tool_calls: Vec<String>,
}

impl TranscriptBlock {
    fn new(role: TranscriptRole) -> Self {
        Self { role, lines: Vec::new(), tool_calls: Vec::new() }
    }

    /// Free text of the block with surrounding blank lines trimmed
    pub fn text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

/// Read and tokenize a transcript file
pub fn read_transcript_blocks(path: &Path) -> Result<Vec<TranscriptBlock>> {
    let content = read_transcript(path)?;
    Ok(parse_transcript(&content))
}

/// Split transcript text into role blocks; text before the first sentinel is ignored
pub fn parse_transcript(content: &str) -> Vec<TranscriptBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<TranscriptBlock> = None;
    let mut in_tool_section = false;

    for raw_line in content.lines() {
        if let Some(role) = TranscriptRole::from_sentinel(raw_line) {
            blocks.extend(current.take());
            current = Some(TranscriptBlock::new(role));
            in_tool_section = false;
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };

        if block.role == TranscriptRole::Assistant {
            let trimmed = raw_line.trim_start();
            if trimmed.starts_with(TOOL_CALL_PREFIX) {
                if let Some(captures) = TOOL_CALL.captures(trimmed) {
                    block.tool_calls.push(captures[1].to_string());
                }
                in_tool_section = true;
                continue;
            }
            if trimmed.starts_with(TOOL_RESULT_PREFIX) {
                in_tool_section = true;
                continue;
            }
            if in_tool_section {
                if raw_line.starts_with([' ', '\t']) {
                    continue;
                }
                in_tool_section = false;
            }
        }

        block.lines.push(strip_wrapper_tags(raw_line));
    }

    blocks.extend(current);
    blocks
}

fn strip_wrapper_tags(line: &str) -> String {
    let mut stripped = line.to_string();
    for tag in WRAPPER_TAGS {
        if stripped.contains(tag) {
            stripped = stripped.replace(tag, "");
        }
    }
    stripped
}
