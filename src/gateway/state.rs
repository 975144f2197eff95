use std::sync::Arc;

use crate::config::Config;
use crate::constants::{DEFAULT_MAX_TOP_K, DEFAULT_SESSION_COOKIE};
use crate::identity::IdentityResolver;
use crate::ranking::RankingEngine;
use crate::store::ScoreStore;

pub struct HandlerState<S, I>
where
    S: ScoreStore + 'static,
    I: IdentityResolver + 'static,
{
    pub engine: Arc<RankingEngine<S>>,

    pub identity: Arc<I>,

    pub session_cookie: String,

    pub max_top_k: usize,
}

impl<S, I> Clone for HandlerState<S, I>
where
    S: ScoreStore + 'static,
    I: IdentityResolver + 'static,
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            identity: Arc::clone(&self.identity),
            session_cookie: self.session_cookie.clone(),
            max_top_k: self.max_top_k,
        }
    }
}

impl<S, I> HandlerState<S, I>
where
    S: ScoreStore + 'static,
    I: IdentityResolver + 'static,
{
    pub fn new(store: S, identity: I) -> Self {
        Self {
            engine: Arc::new(RankingEngine::new(store)),
            identity: Arc::new(identity),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            max_top_k: DEFAULT_MAX_TOP_K,
        }
    }

    pub fn from_config(store: S, identity: I, config: &Config) -> Self {
        Self::new(store, identity)
            .with_session_cookie(config.session_cookie.clone())
            .with_max_top_k(config.max_top_k)
    }

    pub fn with_session_cookie(mut self, name: impl Into<String>) -> Self {
        self.session_cookie = name.into();
        self
    }

    pub fn with_max_top_k(mut self, max_top_k: usize) -> Self {
        self.max_top_k = max_top_k;
        self
    }
}
