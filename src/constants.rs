//! Cross-cutting, shared constants.
//!
//! Values the gateway, engine and stores must agree on live here so a rename in one place
//! cannot drift from the others.

/// `top_k` used when the caller sends nothing usable.
pub const DEFAULT_TOP_K: usize = 1;

/// Upper bound applied to `num_users` unless `LEADERBOARD_MAX_TOP_K` overrides it.
pub const DEFAULT_MAX_TOP_K: usize = 100;

/// Wire value of the `rank` field for callers that were not identified.
pub const UNRANKED_SENTINEL: i64 = -1;

/// Wire value of the `username` field for callers that were not identified.
pub const UNRANKED_DISPLAY_NAME: &str = " ";

/// Default session cookie carrying the caller's access token.
pub const DEFAULT_SESSION_COOKIE: &str = "sb-access-token";

/// Default table holding user balances.
pub const DEFAULT_PROFILES_TABLE: &str = "profiles";

pub const LEADERBOARD_STATUS_HEADER: &str = "X-Leaderboard-Status";
pub const LEADERBOARD_STATUS_HEALTHY: &str = "healthy";
pub const LEADERBOARD_STATUS_READY: &str = "ready";
pub const LEADERBOARD_STATUS_ERROR: &str = "error";
pub const LEADERBOARD_STATUS_RANKED: &str = "ranked";
pub const LEADERBOARD_STATUS_UNRANKED: &str = "unranked";
