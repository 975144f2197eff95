//! HTTP client helpers for tests.

use leaderboard::gateway::{LeaderboardResponse, UserCountResponse};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
const STATUS_HEADER: &str = "x-leaderboard-status";

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// `POST /api/leaderboard`, optionally carrying a session cookie.
    pub async fn leaderboard(
        &self,
        body: &Value,
        session: Option<&str>,
    ) -> Result<(LeaderboardResponse, String), TestClientError> {
        let mut builder = self.client.post(self.url("/api/leaderboard")).json(body);
        if let Some(token) = session {
            builder = builder.header("Cookie", format!("sb-access-token={token}"));
        }

        let resp = builder.send().await?;

        let status_header = resp
            .headers()
            .get(STATUS_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        match resp.status().as_u16() {
            200 => Ok((resp.json().await?, status_header)),
            400 => Err(TestClientError::BadRequest(resp.text().await?)),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, body))
            }
        }
    }

    /// Sends a raw body so malformed payloads can be exercised.
    pub async fn leaderboard_raw(&self, body: &'static str) -> Result<(u16, Value), TestClientError> {
        let resp = self
            .client
            .post(self.url("/api/leaderboard"))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        Ok((status, resp.json().await?))
    }

    pub async fn user_count(&self) -> Result<UserCountResponse, TestClientError> {
        let resp = self
            .client
            .get(self.url("/api/leaderboard/users"))
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn ready(&self) -> Result<ReadyResponse, TestClientError> {
        let resp = self.client.get(self.url("/ready")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub components: ComponentStatus,
}

#[derive(Debug, Deserialize)]
pub struct ComponentStatus {
    pub http: String,
    pub store: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),
}
