use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::constants::LEADERBOARD_STATUS_HEADER;
use crate::identity::IdentityError;
use crate::ranking::RankingError;
use crate::store::StoreError;

/// Body sent to clients when the store or identity service fails.
pub const UPSTREAM_UNAVAILABLE_MESSAGE: &str = "Database connection error";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("ranking failed: {0}")]
    Ranking(#[from] RankingError),

    #[error("score store failed: {0}")]
    Store(#[from] StoreError),

    #[error("identity lookup failed: {0}")]
    Identity(#[from] IdentityError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, error_message, leaderboard_status) = match &self {
            GatewayError::InvalidRequest(message) => {
                (StatusCode::BAD_REQUEST, message.clone(), "invalid_request")
            }
            GatewayError::Ranking(_) | GatewayError::Store(_) => {
                error!(error = %self, "score store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    UPSTREAM_UNAVAILABLE_MESSAGE.to_string(),
                    "store_unavailable",
                )
            }
            GatewayError::Identity(_) => {
                error!(error = %self, "identity service unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    UPSTREAM_UNAVAILABLE_MESSAGE.to_string(),
                    "identity_unavailable",
                )
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            LEADERBOARD_STATUS_HEADER,
            HeaderValue::from_static(leaderboard_status),
        );

        let body = Json(ErrorResponse {
            error: error_message,
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
