use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::models::{ProjectInfo, SubagentFile};
use crate::utils::{decode_and_validate_path, validate_path_not_symlink};

/// Maximum number of projects to process (security: prevent resource exhaustion)
const MAX_PROJECTS: usize = 1000;

/// Maximum number of transcript files per project (security: prevent resource exhaustion)
const MAX_FILES_PER_PROJECT: usize = 10_000;

const LEGACY_AGENT_PREFIX: &str = "agent-";
const SUBAGENTS_DIR: &str = "subagents";

/// Discover all projects in `<claude_dir>/projects/` and the transcripts in each
///
/// A project directory holds:
/// - `<sessionId>.jsonl` main session transcripts
/// - `agent-*.jsonl` legacy subagent transcripts (parent resolved from records)
/// - `<sessionId>/subagents/*.jsonl` subagent transcripts of `<sessionId>`
///
/// Returns an empty Vec if the projects directory doesn't exist (not an error).
///
/// # Errors
///
/// Returns an error only if the projects directory exists but cannot be read.
/// Invalid project names, symlinks, and unreadable project directories are
/// logged and skipped. When a resource limit is hit, discovery logs a warning
/// and keeps what it found so far.
pub fn discover_projects(claude_dir: &Path) -> Result<Vec<ProjectInfo>> {
    let projects_dir = claude_dir.join("projects");

    if !projects_dir.exists() {
        return Ok(Vec::new());
    }

    let mut projects = Vec::new();

    let entries = fs::read_dir(&projects_dir)
        .context(format!("Failed to read projects directory: {}", projects_dir.display()))?;

    for entry in entries.flatten() {
        let path = entry.path();

        if !path.is_dir() {
            continue;
        }

        let encoded_name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };

        let decoded_path = match decode_and_validate_path(&encoded_name) {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping invalid project directory {}: {}", encoded_name, e);
                continue;
            }
        };

        if let Err(e) = validate_path_not_symlink(&path) {
            warn!("Skipping project directory (symlink not allowed) {}: {}", encoded_name, e);
            continue;
        }

        if projects.len() >= MAX_PROJECTS {
            warn!(
                "Resource limit exceeded: more than {} projects in {}, ignoring the rest",
                MAX_PROJECTS,
                projects_dir.display()
            );
            break;
        }

        let (session_files, subagent_files) = match scan_project_dir(&path, MAX_FILES_PER_PROJECT) {
            Ok(files) => files,
            Err(e) => {
                warn!("Failed to read project directory {}: {}", path.display(), e);
                continue;
            }
        };

        projects.push(ProjectInfo {
            encoded_name,
            decoded_path,
            project_dir: path,
            session_files,
            subagent_files,
        });
    }

    projects.sort_by(|a, b| a.encoded_name.cmp(&b.encoded_name));
    Ok(projects)
}

/// Session and subagent transcripts of one project, at most `max_files` in total
fn scan_project_dir(
    project_dir: &Path,
    max_files: usize,
) -> Result<(Vec<PathBuf>, Vec<SubagentFile>)> {
    let mut session_files = Vec::new();
    let mut subagent_files = Vec::new();
    let mut total = 0usize;

    'entries: for entry in fs::read_dir(project_dir)?.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };

        if let Err(e) = validate_path_not_symlink(&path) {
            warn!("Skipping transcript (symlink not allowed) {}: {}", path.display(), e);
            continue;
        }

        if path.is_dir() {
            for file in jsonl_files(&path.join(SUBAGENTS_DIR)) {
                if total >= max_files {
                    warn_file_limit(project_dir, max_files);
                    break 'entries;
                }
                total += 1;
                subagent_files.push(SubagentFile { path: file, parent_session: Some(name.clone()) });
            }
            continue;
        }

        if !name.ends_with(".jsonl") {
            continue;
        }

        if total >= max_files {
            warn_file_limit(project_dir, max_files);
            break;
        }
        total += 1;

        if name.starts_with(LEGACY_AGENT_PREFIX) {
            subagent_files.push(SubagentFile { path, parent_session: None });
        } else {
            session_files.push(path);
        }
    }

    session_files.sort();
    subagent_files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok((session_files, subagent_files))
}

fn warn_file_limit(project_dir: &Path, max_files: usize) {
    warn!(
        "Resource limit exceeded: project {} has more than {} transcripts, ignoring the rest",
        project_dir.display(),
        max_files
    );
}

/// Non-symlink `*.jsonl` files directly inside `dir`; empty when it does not exist
fn jsonl_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "jsonl"))
        .filter(|path| match validate_path_not_symlink(path) {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping subagent transcript (symlink not allowed): {}", e);
                false
            }
        })
        .collect()
}
