//! Source root configuration.
//!
//! Each assistant keeps its transcripts under its own home directory. Roots are
//! resolved in order: explicit value (CLI flag) > environment override > default
//! under the user's home directory.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::models::Platform;
use crate::utils::{dir_from_env, get_home_dir};

pub const CLAUDE_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";
pub const CODEX_DIR_ENV: &str = "CODEX_HOME";
pub const CURSOR_DIR_ENV: &str = "CURSOR_HOME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// `~/.claude`; sessions live under `projects/`
    pub claude_dir: PathBuf,
    /// `~/.codex`; sessions live under `sessions/YYYY/MM/DD/`
    pub codex_dir: PathBuf,
    /// `~/.cursor`; transcripts live under `projects/<name>/agent-transcripts/`
    pub cursor_dir: PathBuf,
    /// Platforms to load; all of them when empty
    pub platforms: Vec<Platform>,
}

impl SourceConfig {
    /// Defaults rooted at `home`, without consulting the environment
    pub fn with_home(home: &Path) -> Self {
        Self {
            claude_dir: home.join(".claude"),
            codex_dir: home.join(".codex"),
            cursor_dir: home.join(".cursor"),
            platforms: Vec::new(),
        }
    }

    /// Defaults from the home directory with environment overrides applied
    pub fn from_env() -> Result<Self> {
        let mut config = Self::with_home(&get_home_dir()?);
        if let Some(dir) = dir_from_env(CLAUDE_DIR_ENV) {
            config.claude_dir = dir;
        }
        if let Some(dir) = dir_from_env(CODEX_DIR_ENV) {
            config.codex_dir = dir;
        }
        if let Some(dir) = dir_from_env(CURSOR_DIR_ENV) {
            config.cursor_dir = dir;
        }
        Ok(config)
    }

    pub fn only(mut self, platform: Platform) -> Self {
        self.platforms = vec![platform];
        self
    }

    pub fn is_enabled(&self, platform: Platform) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&platform)
    }

    pub fn root(&self, platform: Platform) -> &Path {
        match platform {
            Platform::ClaudeCode => &self.claude_dir,
            Platform::Codex => &self.codex_dir,
            Platform::Cursor => &self.cursor_dir,
        }
    }

    pub fn enabled_platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        Platform::ALL.into_iter().filter(|p| self.is_enabled(*p))
    }
}
