//! Discovery for sources laid out as plain file trees (Codex, Cursor)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::models::{Platform, SourceFile};
use crate::utils::validate_path_not_symlink;

/// Maximum number of transcripts collected from one source root
const MAX_SOURCE_FILES: usize = 100_000;

/// `sessions/YYYY/MM/DD/<file>.jsonl`
const CODEX_SESSION_DEPTH: usize = 4;

const CURSOR_TRANSCRIPTS_DIR: &str = "agent-transcripts";

/// Codex session logs under `<codex_dir>/sessions`, sorted by path
///
/// Walks the `YYYY/MM/DD` tree without following symlinks. A missing
/// `sessions` directory yields an empty list.
pub fn discover_codex_sessions(codex_dir: &Path) -> Vec<SourceFile> {
    let sessions_dir = codex_dir.join("sessions");
    if !sessions_dir.is_dir() {
        debug!("Codex sessions directory not found: {}", sessions_dir.display());
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&sessions_dir)
        .max_depth(CODEX_SESSION_DEPTH)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "jsonl") {
            if files.len() >= MAX_SOURCE_FILES {
                warn!(
                    "Resource limit exceeded: more than {} Codex sessions, ignoring the rest",
                    MAX_SOURCE_FILES
                );
                break;
            }
            files.push(SourceFile::main(path.to_path_buf(), Platform::Codex));
        }
    }
    files
}

/// Cursor agent transcripts under `<cursor_dir>/projects/<project>/agent-transcripts`
///
/// The project directory name becomes the project hint, since transcripts
/// carry no working directory.
pub fn discover_cursor_transcripts(cursor_dir: &Path) -> Vec<SourceFile> {
    let projects_dir = cursor_dir.join("projects");
    let entries = match fs::read_dir(&projects_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cursor projects directory not readable {}: {}", projects_dir.display(), e);
            return Vec::new();
        }
    };

    let mut project_dirs: Vec<PathBuf> =
        entries.flatten().map(|entry| entry.path()).filter(|path| path.is_dir()).collect();
    project_dirs.sort();

    let mut files = Vec::new();
    for project_dir in project_dirs {
        if let Err(e) = validate_path_not_symlink(&project_dir) {
            warn!("Skipping Cursor project (symlink not allowed): {}", e);
            continue;
        }
        let Some(project) = project_dir.file_name().map(|n| n.to_string_lossy().to_string())
        else {
            continue;
        };

        for entry in WalkDir::new(project_dir.join(CURSOR_TRANSCRIPTS_DIR))
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !path.extension().is_some_and(|ext| ext == "txt") {
                continue;
            }
            if files.len() >= MAX_SOURCE_FILES {
                warn!(
                    "Resource limit exceeded: more than {} Cursor transcripts, ignoring the rest",
                    MAX_SOURCE_FILES
                );
                return files;
            }
            files.push(
                SourceFile::main(path.to_path_buf(), Platform::Cursor).with_project_hint(&project),
            );
        }
    }
    files
}
