//! Admin handlers
//!
//! Signals from the game host and operators: webhook URL changes, round
//! transitions, session connects and disconnects, and the chat filter switch.

use std::net::IpAddr;

use axum::{extract::State, http::StatusCode, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use relay_common::AppError;
use relay_core::{ConnectedSession, RoundStateProvider, RunLevel};
use relay_service::WebhookIdentity;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::extractors::{UuidPath, ValidatedJson};
use crate::response::{ApiError, ApiResult, NoContent};
use crate::state::AppState;

// ============================================================================
// Webhook
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct SetWebhookRequest {
    /// Empty disables posting
    #[validate(length(max = 2048))]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookStatusResponse {
    pub enabled: bool,
    /// Whether the URL has the Discord webhook shape
    pub recognised: bool,
}

/// PUT /admin/webhook
///
/// The dispatcher applies the new URL asynchronously.
pub async fn set_webhook(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SetWebhookRequest>,
) -> (StatusCode, Json<WebhookStatusResponse>) {
    let url = body.url.trim().to_string();
    let response = WebhookStatusResponse {
        enabled: !url.is_empty(),
        recognised: WebhookIdentity::parse(&url).is_some(),
    };

    state.webhook_url().send_replace(url);
    info!(enabled = response.enabled, recognised = response.recognised, "Webhook URL updated");

    (StatusCode::ACCEPTED, Json(response))
}

// ============================================================================
// Round
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct SetRoundRequest {
    pub run_level: String,
    #[validate(range(min = 0))]
    pub round_id: i32,
}

#[derive(Debug, Serialize)]
pub struct RoundResponse {
    pub run_level: RunLevel,
    pub round_id: i32,
    /// Round context as shown in webhook footers
    pub context: String,
}

/// PUT /admin/round
pub async fn set_round(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SetRoundRequest>,
) -> ApiResult<Json<RoundResponse>> {
    let run_level: RunLevel = body.run_level.parse()?;
    state.round().update(run_level, body.round_id);

    let current = state.round().current();
    Ok(Json(RoundResponse {
        run_level: current.run_level,
        round_id: current.round_id,
        context: current.describe(),
    }))
}

// ============================================================================
// Sessions
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct ConnectSessionRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    pub address: IpAddr,
    /// Base64 encoded hardware id
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub hwid: Option<String>,
}

/// PUT /admin/sessions/:user_id
pub async fn connect_session(
    State(state): State<AppState>,
    UuidPath(user_id): UuidPath,
    ValidatedJson(body): ValidatedJson<ConnectSessionRequest>,
) -> ApiResult<NoContent> {
    let hwid = body
        .hwid
        .as_deref()
        .filter(|h| !h.is_empty())
        .map(|h| STANDARD.decode(h))
        .transpose()
        .map_err(|e| ApiError::invalid_body(format!("hwid: {e}")))?;

    state.sessions().connect(ConnectedSession {
        user_id,
        username: body.username,
        address: body.address,
        hwid,
    });

    Ok(NoContent)
}

/// DELETE /admin/sessions/:user_id
pub async fn disconnect_session(
    State(state): State<AppState>,
    UuidPath(user_id): UuidPath,
) -> ApiResult<NoContent> {
    state
        .sessions()
        .disconnect(user_id)
        .map(|_| NoContent)
        .ok_or_else(|| AppError::not_found(format!("session {user_id}")).into())
}

// ============================================================================
// Chat filter
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct ChatFilterRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatFilterResponse {
    pub enabled: bool,
    pub phrases: usize,
}

/// PUT /admin/chat-filter
pub async fn set_chat_filter(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ChatFilterRequest>,
) -> Json<ChatFilterResponse> {
    state.moderator().set_enabled(body.enabled);

    Json(ChatFilterResponse {
        enabled: state.moderator().is_enabled(),
        phrases: state.moderator().filter().phrase_count(),
    })
}
