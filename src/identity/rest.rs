use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{IdentityError, IdentityResolver};
use crate::store::{EntityId, RestConfig};

#[derive(Debug, Deserialize)]
struct AuthUser {
    #[serde(default)]
    email: Option<String>,
}

/// Resolves session tokens against a hosted auth service, then maps the user's email to a
/// profile id.
///
/// `GET {base}/auth/v1/user` with the caller's token yields the email; the profile row is
/// then read from the configured table with the service key.
#[derive(Clone)]
pub struct RestIdentityResolver {
    client: Client,
    config: RestConfig,
}

impl std::fmt::Debug for RestIdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestIdentityResolver")
            .field("auth_url", &self.auth_url())
            .finish()
    }
}

impl RestIdentityResolver {
    pub fn new(config: RestConfig) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IdentityError::ClientBuild {
                message: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1/user", self.config.base_url)
    }

    async fn email_for_token(&self, token: &str) -> Result<Option<String>, IdentityError> {
        let url = self.auth_url();
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.config.service_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable {
                url: url.clone(),
                message: e.to_string(),
            })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                debug!(status = %response.status(), "session token rejected");
                return Ok(None);
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                return Err(IdentityError::LookupFailed {
                    status: status.as_u16(),
                    message,
                });
            }
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| IdentityError::InvalidResponse {
                message: e.to_string(),
            })?;

        Ok(user.email.filter(|email| !email.trim().is_empty()))
    }

    async fn entity_for_email(&self, email: &str) -> Result<Option<EntityId>, IdentityError> {
        let url = self.config.table_url();
        let columns = &self.config.columns;
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
            .query(&[
                ("select", columns.id.clone()),
                (columns.email.as_str(), format!("eq.{email}")),
                ("limit", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::LookupFailed {
                status: status.as_u16(),
                message,
            });
        }

        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| IdentityError::InvalidResponse {
                message: e.to_string(),
            })?;

        match rows.first().and_then(|row| row.get(&columns.id)) {
            Some(Value::Number(n)) => Ok(Some(EntityId::new(n.to_string()))),
            Some(Value::String(s)) => Ok(Some(EntityId::new(s.clone()))),
            Some(other) => Err(IdentityError::InvalidResponse {
                message: format!("unexpected `{}` value: {}", columns.id, other),
            }),
            None => Ok(None),
        }
    }
}

impl IdentityResolver for RestIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<Option<EntityId>, IdentityError> {
        let Some(email) = self.email_for_token(token).await? else {
            return Ok(None);
        };

        let entity = self.entity_for_email(&email).await?;
        if entity.is_none() {
            debug!("authenticated user has no profile row");
        }
        Ok(entity)
    }
}
