use tracing::{debug, warn};

use crate::constants::DEFAULT_TOP_K;
use crate::store::{ScoreEntry, ScoreStore};

use super::error::RankingError;
use super::types::{Rank, RankQuery, RankResult};

/// Stateless ranking over an injected [`ScoreStore`].
pub struct RankingEngine<S> {
    store: S,
}

impl<S> std::fmt::Debug for RankingEngine<S>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingEngine")
            .field("store", &self.store)
            .finish()
    }
}

impl<S> RankingEngine<S>
where
    S: ScoreStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Competition rank of `target_score`: `1 + count(score > target_score)`.
    pub async fn compute_rank(&self, target_score: i64) -> Result<u64, RankingError> {
        let higher = self
            .store
            .count_with_score_greater_than(target_score)
            .await?;
        Ok(higher + 1)
    }

    /// The first `k` entries by score, descending. `k` of zero is read as 1.
    pub async fn top_k(&self, k: usize) -> Result<Vec<ScoreEntry>, RankingError> {
        let k = k.max(DEFAULT_TOP_K);
        let mut entries = self.store.top_entries_by_score_descending(k).await?;
        entries.truncate(k);
        Ok(entries)
    }

    /// Resolves the caller's rank (if identified) and the current leaders.
    ///
    /// An anonymous caller, or one whose entity has no entry, is reported as
    /// [`Rank::Unranked`]. Store failures propagate.
    pub async fn get_rank_and_top(&self, query: &RankQuery) -> Result<RankResult, RankingError> {
        let caller = match &query.target_entity_id {
            Some(id) => {
                let entry = self.store.get_score_by_entity_id(id).await?;
                if entry.is_none() {
                    warn!(entity_id = %id, "identified caller has no leaderboard entry");
                }
                entry
            }
            None => None,
        };

        let ranked = match caller {
            Some(entry) => {
                let position = self.compute_rank(entry.score).await?;
                Some((Rank::Ranked(position), entry.display_name))
            }
            None => None,
        };

        let top_entries = self.top_k(query.top_k).await?;

        let result = match ranked {
            Some((rank, display_name)) => RankResult {
                rank,
                display_name,
                top_entries,
            },
            None => RankResult::unranked(top_entries),
        };

        debug!(
            rank = %result.rank,
            top_k = query.top_k,
            returned = result.top_entries.len(),
            "leaderboard computed"
        );

        Ok(result)
    }
}
