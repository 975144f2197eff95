use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::error::StoreError;
use super::model::{EntityId, ScoreEntry};
use super::ScoreStore;

/// In-process score store.
///
/// Entries are kept in leaderboard order (see [`ScoreEntry::leaderboard_cmp`]), so the
/// greater-than count is a partition point and top-K is a prefix. Clones share the same
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScoreStore {
    entries: Arc<RwLock<Vec<ScoreEntry>>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = ScoreEntry>) -> Self {
        let store = Self::new();
        for entry in entries {
            store.upsert(entry);
        }
        store
    }

    /// Inserts `entry`, replacing any existing entry with the same id.
    pub fn upsert(&self, entry: ScoreEntry) {
        let mut entries = self.entries.write();
        entries.retain(|e| e.entity_id != entry.entity_id);
        let at = entries.partition_point(|e| e.leaderboard_cmp(&entry).is_lt());
        entries.insert(at, entry);
    }

    /// Removes the entry for `id`, returning it if present.
    pub fn remove(&self, id: &EntityId) -> Option<ScoreEntry> {
        let mut entries = self.entries.write();
        let at = entries.iter().position(|e| &e.entity_id == id)?;
        Some(entries.remove(at))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copy of every entry in leaderboard order.
    pub fn snapshot(&self) -> Vec<ScoreEntry> {
        self.entries.read().clone()
    }
}

impl ScoreStore for InMemoryScoreStore {
    async fn count_with_score_greater_than(&self, score: i64) -> Result<u64, StoreError> {
        let entries = self.entries.read();
        let higher = entries.partition_point(|e| e.score > score);
        debug!(score, higher, "in-memory greater-than count");
        Ok(higher as u64)
    }

    async fn top_entries_by_score_descending(
        &self,
        limit: usize,
    ) -> Result<Vec<ScoreEntry>, StoreError> {
        let entries = self.entries.read();
        Ok(entries.iter().take(limit).cloned().collect())
    }

    async fn get_score_by_entity_id(&self, id: &EntityId) -> Result<Option<ScoreEntry>, StoreError> {
        let entries = self.entries.read();
        Ok(entries.iter().find(|e| &e.entity_id == id).cloned())
    }

    async fn count_entries(&self) -> Result<u64, StoreError> {
        Ok(self.entries.read().len() as u64)
    }
}

/// JSON seed for the in-memory backend.
///
/// ```json
/// { "entries": [{"entity_id": 1, "display_name": "ada", "score": 500}],
///   "sessions": {"token-ada": 1} }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedFile {
    pub entries: Vec<ScoreEntry>,

    /// Session token to entity id, consumed by
    /// [`StaticIdentityResolver`](crate::identity::StaticIdentityResolver).
    #[serde(default)]
    pub sessions: HashMap<String, EntityId>,
}

impl SeedFile {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| StoreError::SeedLoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&raw).map_err(|e| StoreError::SeedLoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn into_store(self) -> (InMemoryScoreStore, HashMap<String, EntityId>) {
        (InMemoryScoreStore::from_entries(self.entries), self.sessions)
    }
}
