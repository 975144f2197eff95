use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, COOKIE},
    },
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::constants::LEADERBOARD_STATUS_HEADER;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{LeaderboardResponse, UserCountResponse, requested_num_users};
use crate::gateway::state::HandlerState;
use crate::identity::IdentityResolver;
use crate::ranking::{RankQuery, normalize_top_k};
use crate::store::ScoreStore;

pub(crate) const MISSING_BODY_MESSAGE: &str = "Request body is required";

#[instrument(
    skip(state, headers, body),
    fields(top_k = tracing::field::Empty, identified = tracing::field::Empty)
)]
pub async fn leaderboard_handler<S, I>(
    State(state): State<HandlerState<S, I>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError>
where
    S: ScoreStore + 'static,
    I: IdentityResolver + 'static,
{
    let request = parse_request_body(&body)?;
    let top_k = normalize_top_k(requested_num_users(&request), state.max_top_k);
    tracing::Span::current().record("top_k", top_k);

    let target = match session_token(&headers, &state.session_cookie) {
        Some(token) => state.identity.resolve(&token).await?,
        None => None,
    };
    tracing::Span::current().record("identified", target.is_some());

    let result = state
        .engine
        .get_rank_and_top(&RankQuery::new(target, top_k))
        .await?;

    debug!(rank = %result.rank, leaders = result.top_entries.len(), "serving leaderboard");

    let mut headers = HeaderMap::new();
    headers.insert(
        LEADERBOARD_STATUS_HEADER,
        HeaderValue::from_static(result.rank.status_label()),
    );

    Ok((
        StatusCode::OK,
        headers,
        Json(LeaderboardResponse::from(result)),
    )
        .into_response())
}

#[instrument(skip(state))]
pub async fn user_count_handler<S, I>(
    State(state): State<HandlerState<S, I>>,
) -> Result<Json<UserCountResponse>, GatewayError>
where
    S: ScoreStore + 'static,
    I: IdentityResolver + 'static,
{
    let users = state.engine.store().count_entries().await?;
    Ok(Json(UserCountResponse { users }))
}

/// The body must be a non-empty JSON object; anything else is rejected.
pub(crate) fn parse_request_body(body: &[u8]) -> Result<serde_json::Value, GatewayError> {
    let missing = || GatewayError::InvalidRequest(MISSING_BODY_MESSAGE.to_string());

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(missing());
    }

    let value: serde_json::Value = serde_json::from_slice(body).map_err(|_| missing())?;
    match value.as_object() {
        Some(fields) if !fields.is_empty() => {}
        _ => return Err(missing()),
    }

    Ok(value)
}

/// Finds the caller's access token: the session cookie first, then a bearer header.
pub(crate) fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == cookie_name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|val| val.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}
