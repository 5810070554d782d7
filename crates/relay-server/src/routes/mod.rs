//! Route definitions

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{admin, chat, health};
use crate::state::AppState;

/// Create the router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .merge(admin_routes())
        .merge(chat_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Runtime configuration and game host signals
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/webhook", put(admin::set_webhook))
        .route("/admin/round", put(admin::set_round))
        .route(
            "/admin/sessions/:user_id",
            put(admin::connect_session).delete(admin::disconnect_session),
        )
        .route("/admin/chat-filter", put(admin::set_chat_filter))
}

/// Chat moderation routes
fn chat_routes() -> Router<AppState> {
    Router::new().route("/chat/check", post(chat::check_message))
}
