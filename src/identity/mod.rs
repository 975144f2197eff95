//! Caller identity resolution.
//!
//! The gateway extracts a session token (cookie or bearer header) and asks an
//! [`IdentityResolver`] which entity it belongs to. "Not logged in" is `Ok(None)`, never an
//! error: only an unreachable or misbehaving identity service fails the request.

pub mod error;
pub mod rest;


pub use error::IdentityError;
pub use rest::RestIdentityResolver;

use std::collections::HashMap;
use std::sync::Arc;

use crate::store::EntityId;

/// Maps a session token to the caller's entity.
pub trait IdentityResolver: Send + Sync {
    /// Returns `Ok(None)` for unknown, expired or rejected tokens.
    fn resolve(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Option<EntityId>, IdentityError>> + Send;
}

/// Fixed token table, used with the in-memory store and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityResolver {
    sessions: Arc<HashMap<String, EntityId>>,
}

impl StaticIdentityResolver {
    pub fn new(sessions: HashMap<String, EntityId>) -> Self {
        Self {
            sessions: Arc::new(sessions),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl FromIterator<(String, EntityId)> for StaticIdentityResolver {
    fn from_iter<T: IntoIterator<Item = (String, EntityId)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<Option<EntityId>, IdentityError> {
        Ok(self.sessions.get(token).cloned())
    }
}
