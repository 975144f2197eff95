//! HTTP gateway (Axum) for the leaderboard.
//!
//! Used by the `leaderboard` binary and the integration-test harness.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::GatewayError;
pub use handler::{leaderboard_handler, user_count_handler};
pub use payload::{LeaderboardResponse, LeaderboardUser, UserCountResponse};
pub use state::HandlerState;

use crate::constants::{
    LEADERBOARD_STATUS_ERROR, LEADERBOARD_STATUS_HEADER, LEADERBOARD_STATUS_HEALTHY,
    LEADERBOARD_STATUS_READY,
};
use crate::identity::IdentityResolver;
use crate::store::ScoreStore;

pub fn create_router_with_state<S, I>(state: HandlerState<S, I>) -> Router
where
    S: ScoreStore + 'static,
    I: IdentityResolver + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/leaderboard", post(leaderboard_handler))
        .route("/api/leaderboard/users", get(user_count_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub store: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        LEADERBOARD_STATUS_HEADER,
        HeaderValue::from_static(LEADERBOARD_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<S, I>(State(state): State<HandlerState<S, I>>) -> Response
where
    S: ScoreStore + 'static,
    I: IdentityResolver + 'static,
{
    let store_status = match state.engine.store().count_entries().await {
        Ok(_) => LEADERBOARD_STATUS_READY,
        Err(e) => {
            warn!(error = %e, "score store not reachable");
            LEADERBOARD_STATUS_ERROR
        }
    };

    let components = ComponentStatus {
        http: LEADERBOARD_STATUS_READY,
        store: store_status,
    };

    let is_ready = components.store == LEADERBOARD_STATUS_READY;

    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "pending" };
    let status_label = if is_ready {
        LEADERBOARD_STATUS_READY
    } else {
        LEADERBOARD_STATUS_ERROR
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        LEADERBOARD_STATUS_HEADER,
        HeaderValue::from_static(status_label),
    );

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
