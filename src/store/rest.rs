use reqwest::header::{CONTENT_RANGE, HeaderMap};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::error::StoreError;
use super::model::{EntityId, ScoreEntry};
use super::ScoreStore;
use crate::constants::DEFAULT_PROFILES_TABLE;

/// Default timeout for hosted-database requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Column names of the profiles table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileColumns {
    pub id: String,
    pub display_name: String,
    pub score: String,
    pub email: String,
}

impl Default for ProfileColumns {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            display_name: "username".to_string(),
            score: "balance".to_string(),
            email: "email".to_string(),
        }
    }
}

/// Connection settings for a PostgREST-compatible hosted database.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project URL, e.g. `https://xyz.example.co` (no trailing `/rest/v1`).
    pub base_url: String,
    /// Service-role key sent as both `apikey` and bearer token.
    pub service_key: String,
    pub table: String,
    pub columns: ProfileColumns,
    pub timeout: Duration,
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            table: DEFAULT_PROFILES_TABLE.to_string(),
            columns: ProfileColumns::default(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    pub(crate) fn build_client(&self) -> Result<Client, StoreError> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| StoreError::ClientBuild {
                message: e.to_string(),
            })
    }
}

/// Score store backed by a hosted table behind a PostgREST API.
#[derive(Clone)]
pub struct RestScoreStore {
    client: Client,
    config: RestConfig,
}

impl std::fmt::Debug for RestScoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestScoreStore")
            .field("url", &self.config.table_url())
            .finish()
    }
}

impl RestScoreStore {
    pub fn new(config: RestConfig) -> Result<Self, StoreError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    fn get(&self) -> RequestBuilder {
        self.client
            .get(self.config.table_url())
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
    }

    fn entry_select(&self) -> String {
        let c = &self.config.columns;
        format!("{},{},{}", c.id, c.display_name, c.score)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Unavailable {
                url: self.config.table_url(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::QueryFailed {
                table: self.config.table.clone(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn fetch_rows(&self, request: RequestBuilder) -> Result<Vec<ScoreEntry>, StoreError> {
        let response = self.send(request).await?;
        let rows: Vec<Value> = response.json().await.map_err(|e| self.invalid(e))?;

        rows.iter()
            .map(|row| parse_entry_row(row, &self.config.columns))
            .collect::<Result<_, _>>()
            .map_err(|message| StoreError::InvalidResponse {
                table: self.config.table.clone(),
                message,
            })
    }

    async fn fetch_count(&self, request: RequestBuilder) -> Result<u64, StoreError> {
        let response = self
            .send(request.header("Prefer", "count=exact"))
            .await?;
        self.total_from_headers(response.headers())
    }

    fn total_from_headers(&self, headers: &HeaderMap) -> Result<u64, StoreError> {
        headers
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| StoreError::InvalidResponse {
                table: self.config.table.clone(),
                message: "missing or malformed Content-Range header".to_string(),
            })
    }

    fn invalid(&self, e: impl std::fmt::Display) -> StoreError {
        StoreError::InvalidResponse {
            table: self.config.table.clone(),
            message: e.to_string(),
        }
    }
}

impl ScoreStore for RestScoreStore {
    async fn count_with_score_greater_than(&self, score: i64) -> Result<u64, StoreError> {
        let c = &self.config.columns;
        let request = self.get().query(&[
            ("select", c.id.clone()),
            (c.score.as_str(), format!("gt.{score}")),
            ("limit", "1".to_string()),
        ]);

        let higher = self.fetch_count(request).await?;
        debug!(score, higher, table = %self.config.table, "remote greater-than count");
        Ok(higher)
    }

    async fn top_entries_by_score_descending(
        &self,
        limit: usize,
    ) -> Result<Vec<ScoreEntry>, StoreError> {
        let c = &self.config.columns;
        let request = self.get().query(&[
            ("select", self.entry_select()),
            ("order", format!("{}.desc,{}.asc", c.score, c.id)),
            ("limit", limit.to_string()),
        ]);

        let entries = self.fetch_rows(request).await?;
        debug!(limit, returned = entries.len(), "remote top entries");
        Ok(entries)
    }

    async fn get_score_by_entity_id(&self, id: &EntityId) -> Result<Option<ScoreEntry>, StoreError> {
        let c = &self.config.columns;
        let request = self.get().query(&[
            ("select", self.entry_select()),
            (c.id.as_str(), format!("eq.{id}")),
            ("limit", "1".to_string()),
        ]);

        Ok(self.fetch_rows(request).await?.into_iter().next())
    }

    async fn count_entries(&self) -> Result<u64, StoreError> {
        let request = self.get().query(&[
            ("select", self.config.columns.id.clone()),
            ("limit", "1".to_string()),
        ]);
        self.fetch_count(request).await
    }
}

/// Extracts the total from a `Content-Range` value such as `0-0/42` or `*/0`.
pub fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.trim().parse().ok()
}

/// Converts one JSON row into a [`ScoreEntry`] using the configured column names.
///
/// Scores may arrive as integers, floats (truncated) or numeric strings.
pub(crate) fn parse_entry_row(row: &Value, columns: &ProfileColumns) -> Result<ScoreEntry, String> {
    let id = match row.get(&columns.id) {
        Some(Value::Number(n)) => EntityId::new(n.to_string()),
        Some(Value::String(s)) => EntityId::new(s.clone()),
        _ => return Err(format!("row is missing `{}`", columns.id)),
    };

    let display_name = match row.get(&columns.display_name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    let score = row
        .get(&columns.score)
        .and_then(integer_from_value)
        .ok_or_else(|| format!("row `{id}` has no integer `{}`", columns.score))?;

    Ok(ScoreEntry {
        entity_id: id,
        display_name,
        score,
    })
}

fn integer_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
