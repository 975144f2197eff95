use crate::constants::{
    DEFAULT_TOP_K, LEADERBOARD_STATUS_RANKED, LEADERBOARD_STATUS_UNRANKED, UNRANKED_DISPLAY_NAME,
    UNRANKED_SENTINEL,
};
use crate::store::{EntityId, ScoreEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Competition rank of a caller.
pub enum Rank {
    /// 1-based position: one more than the number of strictly higher scores.
    Ranked(u64),
    /// Caller was not identified, or has no entry.
    Unranked,
}

impl Rank {
    /// Wire form: the position, or `-1` for [`Rank::Unranked`].
    pub fn as_wire(&self) -> i64 {
        match self {
            Rank::Ranked(position) => i64::try_from(*position).unwrap_or(i64::MAX),
            Rank::Unranked => UNRANKED_SENTINEL,
        }
    }

    pub fn is_ranked(&self) -> bool {
        matches!(self, Rank::Ranked(_))
    }

    pub fn position(&self) -> Option<u64> {
        match self {
            Rank::Ranked(position) => Some(*position),
            Rank::Unranked => None,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            Rank::Ranked(_) => LEADERBOARD_STATUS_RANKED,
            Rank::Unranked => LEADERBOARD_STATUS_UNRANKED,
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rank::Ranked(position) => write!(f, "#{}", position),
            Rank::Unranked => write!(f, "UNRANKED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Input to [`RankingEngine::get_rank_and_top`](super::RankingEngine::get_rank_and_top).
pub struct RankQuery {
    /// Caller's entity; `None` for anonymous callers.
    pub target_entity_id: Option<EntityId>,
    /// Number of leaders to return; always at least 1.
    pub top_k: usize,
}

impl RankQuery {
    pub fn new(target_entity_id: Option<EntityId>, top_k: usize) -> Self {
        Self {
            target_entity_id,
            top_k: top_k.max(DEFAULT_TOP_K),
        }
    }

    pub fn anonymous(top_k: usize) -> Self {
        Self::new(None, top_k)
    }

    pub fn for_entity(id: impl Into<EntityId>, top_k: usize) -> Self {
        Self::new(Some(id.into()), top_k)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Caller's rank plus the current leaders.
pub struct RankResult {
    pub rank: Rank,
    /// Caller's display name, or the unranked placeholder.
    pub display_name: String,
    /// Leaders, non-increasing in score, at most `top_k` long.
    pub top_entries: Vec<ScoreEntry>,
}

impl RankResult {
    pub fn unranked(top_entries: Vec<ScoreEntry>) -> Self {
        Self {
            rank: Rank::Unranked,
            display_name: UNRANKED_DISPLAY_NAME.to_string(),
            top_entries,
        }
    }
}

/// Coerces a requested leader count into `1..=max`.
///
/// Non-positive requests fall back to [`DEFAULT_TOP_K`]; `max` below 1 is treated as 1.
pub fn normalize_top_k(requested: Option<i64>, max: usize) -> usize {
    let max = max.max(DEFAULT_TOP_K);
    match requested {
        Some(k) if k >= 1 => usize::try_from(k).unwrap_or(max).min(max),
        _ => DEFAULT_TOP_K,
    }
}
