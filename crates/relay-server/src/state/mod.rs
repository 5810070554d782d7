//! Application state
//!
//! Shared handles the admin handlers act on.

use std::sync::Arc;

use relay_common::AppConfig;
use relay_db::PgPool;
use relay_service::{AutoModerator, SessionRegistry, SharedRoundState};
use tokio::sync::watch;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pool: PgPool,
    sessions: Arc<SessionRegistry>,
    round: Arc<SharedRoundState>,
    moderator: Arc<AutoModerator>,
    /// Publishes webhook URL changes to the dispatcher
    webhook_url: Arc<watch::Sender<String>>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        sessions: Arc<SessionRegistry>,
        round: Arc<SharedRoundState>,
        moderator: Arc<AutoModerator>,
        webhook_url: watch::Sender<String>,
        config: AppConfig,
    ) -> Self {
        Self {
            pool,
            sessions,
            round,
            moderator,
            webhook_url: Arc::new(webhook_url),
            config: Arc::new(config),
        }
    }

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn round(&self) -> &SharedRoundState {
        &self.round
    }

    pub fn moderator(&self) -> &AutoModerator {
        &self.moderator
    }

    pub fn webhook_url(&self) -> &watch::Sender<String> {
        &self.webhook_url
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions.len())
            .field("chat_filter_enabled", &self.moderator.is_enabled())
            .field("config", &"AppConfig")
            .finish()
    }
}
