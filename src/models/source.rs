use std::path::PathBuf;

use super::conversation::{Platform, SourceKind};

/// One discoverable transcript file, before it is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub platform: Platform,
    pub kind: SourceKind,
    pub parent_id: Option<String>,
    /// Project name implied by the directory layout, used when records carry no cwd
    pub project_hint: Option<String>,
}

impl SourceFile {
    pub fn main(path: PathBuf, platform: Platform) -> Self {
        Self { path, platform, kind: SourceKind::Main, parent_id: None, project_hint: None }
    }

    pub fn with_project_hint(mut self, hint: impl Into<String>) -> Self {
        self.project_hint = Some(hint.into());
        self
    }

    /// File name without extension
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}
