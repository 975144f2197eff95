use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("score store query failed: {0}")]
    Store(#[from] StoreError),
}
