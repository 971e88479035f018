use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Get the user's home directory
///
/// Prefers the platform lookup and falls back to `$HOME`.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    let home = env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home))
}

/// Read a directory override from the environment, ignoring empty values
pub fn dir_from_env(var: &str) -> Option<PathBuf> {
    env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from)
}
