use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, info};

use super::fingerprint::compute_fingerprint;
use crate::analytics::{AnalyticsSummary, compute_summary};
use crate::config::SourceConfig;
use crate::indexer::load_conversations;
use crate::models::Conversation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GenerationId(pub u64);

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One complete build: the conversations and the summary computed from them
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub id: GenerationId,
    pub fingerprint: String,
    pub built_at: DateTime<Utc>,
    pub conversations: Vec<Conversation>,
    pub summary: AnalyticsSummary,
}

/// Holds the latest published generation
///
/// Builds happen outside the read lock and are published with a single
/// pointer swap, so readers always see a complete generation. Concurrent
/// refreshes are serialized.
pub struct AnalyticsStore {
    config: SourceConfig,
    current: RwLock<Option<Arc<Generation>>>,
    next_id: AtomicU64,
    build_lock: Mutex<()>,
}

impl AnalyticsStore {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            current: RwLock::new(None),
            next_id: AtomicU64::new(1),
            build_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn current_generation(&self) -> Option<Arc<Generation>> {
        self.current.read().clone()
    }

    /// Rebuild when the sources changed (or always, when `forced`)
    ///
    /// Returns the id of the generation that is current afterwards.
    pub fn refresh(&self, forced: bool) -> Result<GenerationId> {
        let _build = self.build_lock.lock();

        let fingerprint = compute_fingerprint(&self.config)?;
        if !forced {
            if let Some(current) = self.current_generation() {
                if current.fingerprint == fingerprint {
                    debug!("Sources unchanged, keeping generation {}", current.id);
                    return Ok(current.id);
                }
            }
        }

        let conversations = load_conversations(&self.config)?;
        let summary = compute_summary(&conversations);
        let id = GenerationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let generation = Generation {
            id,
            fingerprint,
            built_at: Utc::now(),
            conversations,
            summary,
        };

        info!(
            "Published generation {} ({} conversations)",
            id,
            generation.conversations.len()
        );
        *self.current.write() = Some(Arc::new(generation));
        Ok(id)
    }

    /// The current generation, building the first one if none exists yet
    pub fn get_or_build(&self) -> Result<Arc<Generation>> {
        if let Some(generation) = self.current_generation() {
            return Ok(generation);
        }
        self.refresh(false)?;
        self.current_generation()
            .ok_or_else(|| anyhow::anyhow!("No generation was published after refresh"))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::thread;

    use tempfile::TempDir;

    use super::*;

    fn write_session(home: &Path, name: &str, prompt: &str) {
        let path = home.join(".codex/sessions/2025/01/01").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let line = format!(
            r#"{{"type":"response_item","payload":{{"type":"message","role":"user","content":"{prompt}"}}}}"#
        );
        fs::write(path, line).unwrap();
    }

    #[test]
    fn test_first_refresh_publishes_generation() {
        let home = TempDir::new().unwrap();
        write_session(home.path(), "a.jsonl", "fix the bug");
        let store = AnalyticsStore::new(SourceConfig::with_home(home.path()));

        assert!(store.current_generation().is_none());
        let id = store.refresh(false).unwrap();

        let generation = store.current_generation().unwrap();
        assert_eq!(generation.id, id);
        assert_eq!(generation.conversations.len(), 1);
        assert_eq!(generation.summary.overview.total_conversations, 1);
    }

    #[test]
    fn test_unchanged_sources_keep_generation() {
        let home = TempDir::new().unwrap();
        write_session(home.path(), "a.jsonl", "hello");
        let store = AnalyticsStore::new(SourceConfig::with_home(home.path()));

        let first = store.refresh(false).unwrap();
        let before = store.current_generation().unwrap();
        let second = store.refresh(false).unwrap();

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&before, &store.current_generation().unwrap()));
    }

    #[test]
    fn test_forced_refresh_builds_new_generation() {
        let home = TempDir::new().unwrap();
        write_session(home.path(), "a.jsonl", "hello");
        let store = AnalyticsStore::new(SourceConfig::with_home(home.path()));

        let first = store.refresh(false).unwrap();
        let second = store.refresh(true).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_changed_sources_rebuild() {
        let home = TempDir::new().unwrap();
        write_session(home.path(), "a.jsonl", "hello");
        let store = AnalyticsStore::new(SourceConfig::with_home(home.path()));

        let first = store.refresh(false).unwrap();
        let old = store.current_generation().unwrap();
        write_session(home.path(), "b.jsonl", "add a feature");
        let second = store.refresh(false).unwrap();

        assert_ne!(first, second);
        assert_eq!(store.current_generation().unwrap().conversations.len(), 2);
        // readers holding the old generation keep a consistent snapshot
        assert_eq!(old.conversations.len(), 1);
    }

    #[test]
    fn test_concurrent_readers_see_complete_generations() {
        let home = TempDir::new().unwrap();
        write_session(home.path(), "a.jsonl", "hello");
        let store = Arc::new(AnalyticsStore::new(SourceConfig::with_home(home.path())));
        store.refresh(false).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..20 {
                        let generation = store.current_generation().unwrap();
                        assert_eq!(
                            generation.summary.overview.total_conversations,
                            generation.conversations.len()
                        );
                    }
                })
            })
            .collect();

        for _ in 0..3 {
            store.refresh(true).unwrap();
        }
        for reader in readers {
            reader.join().unwrap();
        }
    }

    #[test]
    fn test_get_or_build() {
        let home = TempDir::new().unwrap();
        let store = AnalyticsStore::new(SourceConfig::with_home(home.path()));
        let generation = store.get_or_build().unwrap();
        assert!(generation.conversations.is_empty());
        assert_eq!(generation.id, GenerationId(1));
    }
}
