#![cfg(any(test, feature = "mock"))]

use super::error::StoreError;
use super::model::{EntityId, ScoreEntry};
use super::ScoreStore;

/// Store whose every query fails with [`StoreError::Unavailable`].
#[derive(Debug, Clone)]
pub struct UnavailableScoreStore {
    url: String,
}

impl Default for UnavailableScoreStore {
    fn default() -> Self {
        Self::new("mock://unavailable")
    }
}

impl UnavailableScoreStore {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn error(&self) -> StoreError {
        StoreError::Unavailable {
            url: self.url.clone(),
            message: "connection refused".to_string(),
        }
    }
}

impl ScoreStore for UnavailableScoreStore {
    async fn count_with_score_greater_than(&self, _score: i64) -> Result<u64, StoreError> {
        Err(self.error())
    }

    async fn top_entries_by_score_descending(
        &self,
        _limit: usize,
    ) -> Result<Vec<ScoreEntry>, StoreError> {
        Err(self.error())
    }

    async fn get_score_by_entity_id(&self, _id: &EntityId) -> Result<Option<ScoreEntry>, StoreError> {
        Err(self.error())
    }

    async fn count_entries(&self) -> Result<u64, StoreError> {
        Err(self.error())
    }
}
