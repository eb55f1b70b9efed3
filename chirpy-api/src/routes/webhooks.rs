/// Payment provider webhooks
///
/// ```text
/// POST /api/polka/webhooks
/// Authorization: ApiKey <POLKA_KEY>
///
/// { "event": "user.upgraded", "data": { "user_id": "uuid" } }
/// ```
///
/// Only `user.upgraded` has an effect: it turns on Chirpy Red for the user.
/// Other events are acknowledged with 204 so the provider stops retrying.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chirpy_shared::auth::api_key::authenticate_webhook;
use serde::Deserialize;
use uuid::Uuid;

/// Event that upgrades a user to Chirpy Red
pub const USER_UPGRADED: &str = "user.upgraded";

#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub event: String,

    /// Event payload; only read for events we act on
    #[serde(default)]
    pub data: Option<WebhookData>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub user_id: Option<String>,
}

/// Handles a payment provider event
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or wrong `ApiKey` (checked before the body is parsed)
/// - `400 Bad Request`: Malformed body, or `user.upgraded` without a valid user ID
/// - `404 Not Found`: `user.upgraded` for an unknown user
pub async fn polka_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<WebhookRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    authenticate_webhook(&headers, &state.config.polka.api_key)?;

    let Json(req) = payload?;

    if req.event != USER_UPGRADED {
        tracing::debug!(event = %req.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = req
        .data
        .and_then(|data| data.user_id)
        .and_then(|raw| Uuid::parse_str(&raw).ok())
        .ok_or_else(|| ApiError::BadRequest("Invalid user ID".to_string()))?;

    if !state.store.upgrade_user(user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(%user_id, "User upgraded to Chirpy Red");

    Ok(StatusCode::NO_CONTENT)
}
