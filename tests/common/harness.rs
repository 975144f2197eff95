//! Test server harness.

use leaderboard::gateway::{HandlerState, create_router_with_state};
use leaderboard::identity::{IdentityResolver, RestIdentityResolver, StaticIdentityResolver};
use leaderboard::store::{EntityId, InMemoryScoreStore, RestConfig, RestScoreStore, ScoreEntry, ScoreStore};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::fake_postgrest::{FakePostgrest, SERVICE_KEY};

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, Default)]
pub struct TestServerConfig {
    pub entries: Vec<ScoreEntry>,
    /// (token, entity id)
    pub sessions: Vec<(String, String)>,
    pub max_top_k: Option<usize>,
}

impl TestServerConfig {
    pub fn entry(mut self, id: &str, name: &str, score: i64) -> Self {
        self.entries.push(ScoreEntry::new(id, name, score));
        self
    }

    pub fn session(mut self, token: &str, id: &str) -> Self {
        self.sessions.push((token.to_string(), id.to_string()));
        self
    }

    pub fn max_top_k(mut self, max_top_k: usize) -> Self {
        self.max_top_k = Some(max_top_k);
        self
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Serves `state` on an ephemeral localhost port.
pub async fn spawn_server<S, I>(state: HandlerState<S, I>) -> Result<TestServer, ServerStartupError>
where
    S: ScoreStore + 'static,
    I: IdentityResolver + 'static,
{
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let local_addr = listener.local_addr()?;

    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Spawns a server over the in-memory store with a static token table.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let store = InMemoryScoreStore::from_entries(config.entries);
    let identity: StaticIdentityResolver = config
        .sessions
        .into_iter()
        .map(|(token, id)| (token, EntityId::from(id)))
        .collect();

    let mut state = HandlerState::new(store, identity);
    if let Some(max_top_k) = config.max_top_k {
        state = state.with_max_top_k(max_top_k);
    }

    spawn_server(state).await
}

/// Spawns a server whose store and identity resolver both talk to `backend`.
pub async fn spawn_rest_server(backend: &FakePostgrest) -> Result<TestServer, ServerStartupError> {
    let config = RestConfig::new(format!("{}/", backend.url()), SERVICE_KEY)
        .timeout(Duration::from_secs(2));

    let store = RestScoreStore::new(config.clone())
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    let identity = RestIdentityResolver::new(config)
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    spawn_server(HandlerState::new(store, identity)).await
}
