//! Chat moderation handler

use axum::{extract::State, Json};
use relay_service::{ChatChannel, ChatMessage, ModerationOutcome};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ChatCheckRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    pub channel: ChatChannel,
    #[validate(length(min = 1, max = 4096))]
    pub message: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatCheckResponse {
    pub blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ban_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase: Option<String>,
}

/// POST /chat/check
///
/// A blocked message has already resulted in a ban; the caller should drop it.
pub async fn check_message(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ChatCheckRequest>,
) -> ApiResult<Json<ChatCheckResponse>> {
    let message = ChatMessage {
        user_id: body.user_id,
        username: body.username,
        channel: body.channel,
        text: body.message,
        is_admin: body.is_admin,
    };

    let response = match state.moderator().check_message(&message).await? {
        ModerationOutcome::Allowed => ChatCheckResponse {
            blocked: false,
            ban_id: None,
            phrase: None,
        },
        ModerationOutcome::Banned { ban_id, phrase } => ChatCheckResponse {
            blocked: true,
            ban_id: Some(ban_id),
            phrase: Some(phrase),
        },
    };

    Ok(Json(response))
}
