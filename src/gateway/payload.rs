use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ranking::RankResult;
use crate::store::ScoreEntry;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardUser {
    pub username: String,
    pub balance: i64,
}

impl From<ScoreEntry> for LeaderboardUser {
    fn from(entry: ScoreEntry) -> Self {
        Self {
            username: entry.display_name,
            balance: entry.score,
        }
    }
}

/// `POST /api/leaderboard` response body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardResponse {
    /// Caller's position, or `-1` when unranked.
    pub rank: i64,
    pub username: String,
    pub top_users: Vec<LeaderboardUser>,
}

impl From<RankResult> for LeaderboardResponse {
    fn from(result: RankResult) -> Self {
        Self {
            rank: result.rank.as_wire(),
            username: result.display_name,
            top_users: result
                .top_entries
                .into_iter()
                .map(LeaderboardUser::from)
                .collect(),
        }
    }
}

/// `GET /api/leaderboard/users` response body.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserCountResponse {
    pub users: u64,
}

/// Reads `num_users` loosely: integers as-is, floats truncated, numeric strings parsed,
/// booleans as 0/1. Anything else is `None`.
pub fn requested_num_users(body: &Value) -> Option<i64> {
    match body.get("num_users")? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}
