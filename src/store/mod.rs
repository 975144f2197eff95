//! Score store backends.
//!
//! The ranking engine never owns data. It asks a [`ScoreStore`] three questions (how many
//! entries beat a score, which entries are on top, what does one entity score) and composes
//! the answers. Backends:
//!
//! - [`InMemoryScoreStore`]: sorted in-process snapshot, optionally seeded from JSON.
//! - [`RestScoreStore`]: PostgREST-compatible hosted table (`/rest/v1/{table}`).
//! - [`UnavailableScoreStore`]: always fails; behind `#[cfg(any(test, feature = "mock"))]`.

pub mod error;
pub mod memory;
pub mod mock;
pub mod model;
pub mod rest;


pub use error::StoreError;
pub use memory::{InMemoryScoreStore, SeedFile};
#[cfg(any(test, feature = "mock"))]
pub use mock::UnavailableScoreStore;
pub use model::{EntityId, ScoreEntry};
pub use rest::{ProfileColumns, RestConfig, RestScoreStore, parse_content_range_total};

/// Read-only source of (entity, score) pairs.
///
/// Implementations must return `top_entries_by_score_descending` in non-increasing score
/// order; equal scores are ordered by [`EntityId`] ascending.
pub trait ScoreStore: Send + Sync {
    /// Counts entries whose score is strictly greater than `score`.
    fn count_with_score_greater_than(
        &self,
        score: i64,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;

    /// Returns up to `limit` entries, highest score first.
    fn top_entries_by_score_descending(
        &self,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ScoreEntry>, StoreError>> + Send;

    /// Looks up one entity's current entry.
    fn get_score_by_entity_id(
        &self,
        id: &EntityId,
    ) -> impl std::future::Future<Output = Result<Option<ScoreEntry>, StoreError>> + Send;

    /// Counts all entries.
    fn count_entries(&self) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}
