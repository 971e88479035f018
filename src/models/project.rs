use std::path::PathBuf;

use super::conversation::{Platform, SourceKind};
use super::source::SourceFile;

/// A Claude Code project directory and the transcripts found in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub encoded_name: String,
    pub decoded_path: PathBuf,
    pub project_dir: PathBuf,
    pub session_files: Vec<PathBuf>,
    pub subagent_files: Vec<SubagentFile>,
}

/// A nested sub-task transcript and the session it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubagentFile {
    pub path: PathBuf,
    /// Parent session id when it is implied by the directory layout
    pub parent_session: Option<String>,
}

impl ProjectInfo {
    /// Project name implied by the directory, used when records carry no cwd
    pub fn project_hint(&self) -> String {
        crate::utils::project_name(&self.decoded_path.to_string_lossy())
    }

    /// Every transcript in this project as a source awaiting normalization
    pub fn source_files(&self) -> Vec<SourceFile> {
        let hint = self.project_hint();
        let mains = self
            .session_files
            .iter()
            .map(|path| SourceFile::main(path.clone(), Platform::ClaudeCode).with_project_hint(&hint));
        let subagents = self.subagent_files.iter().map(|agent| SourceFile {
            path: agent.path.clone(),
            platform: Platform::ClaudeCode,
            kind: SourceKind::Subagent,
            parent_id: agent.parent_session.clone(),
            project_hint: Some(hint.clone()),
        });
        mains.chain(subagents).collect()
    }
}
