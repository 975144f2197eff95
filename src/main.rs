//! Leaderboard HTTP server entrypoint.

use std::net::SocketAddr;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use leaderboard::config::{Config, StoreBackend};
use leaderboard::gateway::{HandlerState, create_router_with_state};
use leaderboard::identity::{IdentityResolver, RestIdentityResolver, StaticIdentityResolver};
use leaderboard::store::{InMemoryScoreStore, RestScoreStore, ScoreStore, SeedFile};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run())
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        backend = ?config.store_backend,
        max_top_k = config.max_top_k,
        "Leaderboard starting"
    );

    match config.store_backend {
        StoreBackend::Memory => {
            let (store, identity) = match &config.seed_path {
                Some(path) => {
                    let seed = SeedFile::load(path)?;
                    let (store, sessions) = seed.into_store();
                    tracing::info!(
                        path = %path.display(),
                        entries = store.len(),
                        sessions = sessions.len(),
                        "Loaded seed file"
                    );
                    (store, StaticIdentityResolver::new(sessions))
                }
                None => {
                    tracing::warn!("No LEADERBOARD_SEED_PATH configured, starting with an empty board");
                    (InMemoryScoreStore::new(), StaticIdentityResolver::default())
                }
            };
            serve(addr, &config, store, identity).await
        }
        StoreBackend::Rest => {
            let rest_config = config.rest_config()?;
            tracing::info!(table_url = %rest_config.table_url(), "Using PostgREST score store");
            let store = RestScoreStore::new(rest_config.clone())?;
            let identity = RestIdentityResolver::new(rest_config)?;
            serve(addr, &config, store, identity).await
        }
    }
}

async fn serve<S, I>(addr: SocketAddr, config: &Config, store: S, identity: I) -> anyhow::Result<()>
where
    S: ScoreStore + 'static,
    I: IdentityResolver + 'static,
{
    let state = HandlerState::from_config(store, identity, config);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Leaderboard shutdown complete");
    Ok(())
}

/// Probes `/healthz` on the configured port. Runs before any runtime exists, so it owns one.
fn run_health_check() -> i32 {
    let port = std::env::var("LEADERBOARD_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
