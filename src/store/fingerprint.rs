//! Change detection over the discoverable transcript files

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::SourceConfig;
use crate::indexer::discover_sources;

/// Size and modification time of one transcript, as hashed into the fingerprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    pub path: String,
    pub size: u64,
    pub mtime_nanos: u128,
}

impl FileStamp {
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
        let mtime = metadata
            .modified()
            .with_context(|| format!("Failed to read modification time: {}", path.display()))?;
        let mtime_nanos = mtime
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);

        Ok(Self { path: path.to_string_lossy().into_owned(), size: metadata.len(), mtime_nanos })
    }

    fn line(&self) -> String {
        format!("{}|{}|{}\n", self.path, self.size, self.mtime_nanos)
    }
}

/// Hex SHA-256 over `path|size|mtime_nanos` lines of every discoverable file, sorted by path
///
/// Files that disappear between discovery and stat are left out.
pub fn compute_fingerprint(config: &SourceConfig) -> Result<String> {
    let mut stamps: Vec<FileStamp> = discover_sources(config)
        .iter()
        .filter_map(|source| match FileStamp::from_path(&source.path) {
            Ok(stamp) => Some(stamp),
            Err(e) => {
                debug!("Leaving file out of fingerprint: {:#}", e);
                None
            }
        })
        .collect();
    Ok(fingerprint_stamps(&mut stamps))
}

pub fn fingerprint_stamps(stamps: &mut [FileStamp]) -> String {
    stamps.sort_by(|a, b| a.path.cmp(&b.path));
    let mut hasher = Sha256::new();
    for stamp in stamps.iter() {
        hasher.update(stamp.line().as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
