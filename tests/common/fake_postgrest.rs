//! In-process stand-in for a PostgREST table plus the `/auth/v1/user` endpoint.
//!
//! Understands just the query shapes the leaderboard sends: `gt.`/`eq.` filters, a
//! two-key `order`, `limit`, `select` projection and `Prefer: count=exact`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::CONTENT_RANGE},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const SERVICE_KEY: &str = "test-service-key";

#[derive(Debug, Clone)]
pub struct ProfileRow {
    pub id: i64,
    pub username: Option<String>,
    pub balance: i64,
    pub email: String,
}

impl ProfileRow {
    pub fn new(id: i64, username: &str, balance: i64) -> Self {
        Self {
            id,
            username: Some(username.to_string()),
            balance,
            email: format!("{username}@example.com"),
        }
    }

    fn column(&self, name: &str) -> Value {
        match name {
            "id" => json!(self.id),
            "username" => json!(self.username),
            "balance" => json!(self.balance),
            "email" => json!(self.email),
            _ => Value::Null,
        }
    }
}

#[derive(Default)]
struct FakeState {
    rows: Vec<ProfileRow>,
    /// access token -> email
    sessions: HashMap<String, String>,
    failing: AtomicBool,
    table_requests: AtomicUsize,
}

pub struct FakePostgrest {
    pub addr: SocketAddr,
    state: Arc<FakeState>,
    _handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl FakePostgrest {
    pub async fn start(rows: Vec<ProfileRow>, sessions: &[(&str, &str)]) -> std::io::Result<Self> {
        let state = Arc::new(FakeState {
            rows,
            sessions: sessions
                .iter()
                .map(|(token, email)| (token.to_string(), email.to_string()))
                .collect(),
            ..FakeState::default()
        });

        let app = Router::new()
            .route("/rest/v1/{table}", get(table_handler))
            .route("/auth/v1/user", get(auth_user_handler))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Makes every table request answer 500 until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    pub fn table_requests(&self) -> usize {
        self.state.table_requests.load(Ordering::SeqCst)
    }
}

impl Drop for FakePostgrest {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(SERVICE_KEY)
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn matches_filter(row: &ProfileRow, column: &str, filter: &str) -> bool {
    let value = row.column(column);
    if let Some(rhs) = filter.strip_prefix("gt.") {
        return match (value.as_i64(), rhs.parse::<i64>()) {
            (Some(lhs), Ok(rhs)) => lhs > rhs,
            _ => false,
        };
    }
    if let Some(rhs) = filter.strip_prefix("eq.") {
        return match &value {
            Value::String(s) => s == rhs,
            Value::Number(n) => n.to_string() == rhs,
            _ => false,
        };
    }
    false
}

fn sort_rows(rows: &mut [&ProfileRow], order: &str) {
    let keys: Vec<(String, bool)> = order
        .split(',')
        .filter_map(|key| key.split_once('.'))
        .map(|(column, dir)| (column.to_string(), dir == "desc"))
        .collect();

    rows.sort_by(|a, b| {
        keys.iter()
            .map(|(column, desc)| {
                let lhs = a.column(column).as_i64().unwrap_or_default();
                let rhs = b.column(column).as_i64().unwrap_or_default();
                if *desc { rhs.cmp(&lhs) } else { lhs.cmp(&rhs) }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

async fn table_handler(
    State(state): State<Arc<FakeState>>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.table_requests.fetch_add(1, Ordering::SeqCst);

    if !authorized(&headers) || bearer(&headers) != Some(SERVICE_KEY) {
        return (StatusCode::UNAUTHORIZED, "invalid api key").into_response();
    }
    if state.failing.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database is down").into_response();
    }
    if table != "profiles" {
        return (StatusCode::NOT_FOUND, "relation does not exist").into_response();
    }

    let mut rows: Vec<&ProfileRow> = state
        .rows
        .iter()
        .filter(|row| {
            params
                .iter()
                .filter(|(key, _)| !matches!(key.as_str(), "select" | "order" | "limit"))
                .all(|(column, filter)| matches_filter(row, column, filter))
        })
        .collect();
    let total = rows.len();

    if let Some(order) = params.get("order") {
        sort_rows(&mut rows, order);
    }
    if let Some(limit) = params.get("limit").and_then(|l| l.parse::<usize>().ok()) {
        rows.truncate(limit);
    }

    let columns: Vec<&str> = params
        .get("select")
        .map(|s| s.split(',').collect())
        .unwrap_or_else(|| vec!["id", "username", "balance", "email"]);
    let body: Vec<Value> = rows
        .iter()
        .map(|row| {
            let projected: Map<String, Value> = columns
                .iter()
                .map(|column| (column.to_string(), row.column(column)))
                .collect();
            Value::Object(projected)
        })
        .collect();

    let mut response_headers = HeaderMap::new();
    let wants_count = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("count=exact"));
    if wants_count {
        let range = if body.is_empty() {
            format!("*/{total}")
        } else {
            format!("0-{}/{total}", body.len() - 1)
        };
        if let Ok(value) = HeaderValue::from_str(&range) {
            response_headers.insert(CONTENT_RANGE, value);
        }
    }

    (StatusCode::OK, response_headers, Json(body)).into_response()
}

async fn auth_user_handler(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "invalid api key").into_response();
    }

    match bearer(&headers).and_then(|token| state.sessions.get(token)) {
        Some(email) => Json(json!({ "id": "auth-uuid", "email": email })).into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "invalid JWT" })),
        )
            .into_response(),
    }
}
