//! Leaderboard library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Ranking
//! - [`RankingEngine`] - competition ranking over any [`ScoreStore`]
//! - [`RankQuery`], [`RankResult`], [`Rank`] - engine input and output
//!
//! ## Stores
//! - [`ScoreStore`] - the three reads the engine needs (plus a row count)
//! - [`InMemoryScoreStore`], [`SeedFile`] - in-process backend
//! - [`RestScoreStore`], [`RestConfig`] - PostgREST backend
//!
//! ## Identity
//! - [`IdentityResolver`] - session token to entity id
//! - [`StaticIdentityResolver`], [`RestIdentityResolver`]
//!
//! ## Gateway
//! - [`gateway::create_router_with_state`], [`HandlerState`] - Axum router
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod gateway;
pub mod identity;
pub mod ranking;
pub mod store;

pub use config::{Config, ConfigError, StoreBackend};
pub use gateway::{GatewayError, HandlerState, LeaderboardResponse, LeaderboardUser};
pub use identity::{IdentityError, IdentityResolver, RestIdentityResolver, StaticIdentityResolver};
pub use ranking::{Rank, RankQuery, RankResult, RankingEngine, RankingError, normalize_top_k};
#[cfg(any(test, feature = "mock"))]
pub use store::UnavailableScoreStore;
pub use store::{
    EntityId, InMemoryScoreStore, RestConfig, RestScoreStore, ScoreEntry, ScoreStore, SeedFile,
    StoreError,
};
