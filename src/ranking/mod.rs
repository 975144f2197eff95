//! Competition ranking over a score store.
//!
//! A caller with score `S` is ranked `1 + |{e : e.score > S}|` ("1224" ranking): ties share
//! the best position and the next distinct score skips past them. The engine owns no data;
//! every answer is composed from [`ScoreStore`](crate::store::ScoreStore) queries issued
//! one after another:
//!
//! 1. point lookup of the caller's entry (identified callers only)
//! 2. greater-than count for the caller's score
//! 3. top-K listing
//!
//! Leader ties are broken by entity id ascending, which both bundled stores honor.

pub mod engine;
pub mod error;
pub mod types;


pub use engine::RankingEngine;
pub use error::RankingError;
pub use types::{Rank, RankQuery, RankResult, normalize_top_k};
