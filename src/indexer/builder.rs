//! Loading every enabled source into canonical conversations.
//!
//! # Error Handling Strategy
//!
//! This module follows a **graceful degradation** approach suitable for CLI tools:
//!
//! - **Root-level errors**: A missing source root yields no files. A root that exists
//!   but cannot be listed is logged and contributes nothing.
//! - **File-level errors**: A transcript that cannot be opened or is too large is logged
//!   with `tracing::warn!` and skipped; the remaining files still load.
//! - **Line-level errors**: Delegated to the parsers, which skip malformed lines and
//!   count them in the conversation's `skippedLines` metadata.
//!
//! A summary line is logged at `info` level with loaded and failed file counts.

use anyhow::Result;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::SourceConfig;
use crate::indexer::project_discovery::discover_projects;
use crate::indexer::session_discovery::{discover_codex_sessions, discover_cursor_transcripts};
use crate::models::{Conversation, Platform, SourceFile};
use crate::normalizer::normalize_file;

/// Every transcript file of the enabled sources, in a stable order
pub fn discover_sources(config: &SourceConfig) -> Vec<SourceFile> {
    let mut sources = Vec::new();

    for platform in config.enabled_platforms() {
        let root = config.root(platform);
        match platform {
            Platform::ClaudeCode => match discover_projects(root) {
                Ok(projects) => {
                    sources.extend(projects.iter().flat_map(|project| project.source_files()))
                }
                Err(e) => warn!("Failed to discover Claude Code projects: {:#}", e),
            },
            Platform::Codex => sources.extend(discover_codex_sessions(root)),
            Platform::Cursor => sources.extend(discover_cursor_transcripts(root)),
        }
    }

    sources
}

/// Discover, read, and normalize every enabled source
///
/// Files are normalized in parallel; the result keeps discovery order so
/// repeated loads over unchanged inputs produce identical output.
///
/// # Errors
///
/// Never fails because of an individual source or file; the `Result` is kept
/// for callers that treat loading as a fallible step.
///
/// # Examples
///
/// ```no_run
/// use agent_log_analytics::config::SourceConfig;
/// use agent_log_analytics::load_conversations;
///
/// let config = SourceConfig::from_env()?;
/// let conversations = load_conversations(&config)?;
/// println!("Loaded {} conversations", conversations.len());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn load_conversations(config: &SourceConfig) -> Result<Vec<Conversation>> {
    let sources = discover_sources(config);
    Ok(normalize_sources(&sources))
}

/// Normalize already-discovered files, skipping the ones that cannot be read
pub fn normalize_sources(sources: &[SourceFile]) -> Vec<Conversation> {
    let results: Vec<Option<Conversation>> = sources
        .par_iter()
        .map(|source| match normalize_file(source) {
            Ok(conversation) => Some(conversation),
            Err(e) => {
                warn!("Skipping {} transcript {}: {:#}", source.platform, source.path.display(), e);
                None
            }
        })
        .collect();

    let failed = results.iter().filter(|r| r.is_none()).count();
    let conversations: Vec<Conversation> = results.into_iter().flatten().collect();

    info!(
        "Loaded {} conversations ({} files discovered, {} failed)",
        conversations.len(),
        sources.len(),
        failed
    );

    conversations
}
