//! Service context - dependency container for services
//!
//! Holds the repositories, runtime collaborators and the webhook dispatcher the
//! notification processor and auto-moderator work against.

use std::sync::Arc;

use relay_core::{BanRepository, ServerIdentity, SessionEnforcer};

use super::error::{ServiceError, ServiceResult};
use super::webhook::WebhookDispatcher;

/// Service context containing all dependencies
///
/// Cheap to clone; every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    ban_repo: Arc<dyn BanRepository>,
    server_identity: Arc<dyn ServerIdentity>,

    // Runtime collaborators
    sessions: Arc<dyn SessionEnforcer>,

    webhook: Arc<WebhookDispatcher>,
}

impl ServiceContext {
    pub fn new(
        ban_repo: Arc<dyn BanRepository>,
        server_identity: Arc<dyn ServerIdentity>,
        sessions: Arc<dyn SessionEnforcer>,
        webhook: Arc<WebhookDispatcher>,
    ) -> Self {
        Self {
            ban_repo,
            server_identity,
            sessions,
            webhook,
        }
    }

    // === Repositories ===

    pub fn ban_repo(&self) -> &dyn BanRepository {
        self.ban_repo.as_ref()
    }

    pub fn server_identity(&self) -> &dyn ServerIdentity {
        self.server_identity.as_ref()
    }

    // === Collaborators ===

    pub fn sessions(&self) -> &dyn SessionEnforcer {
        self.sessions.as_ref()
    }

    /// Shared handle to the webhook dispatcher, for queued posts
    pub fn webhook(&self) -> &Arc<WebhookDispatcher> {
        &self.webhook
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("collaborators", &"...")
            .field("webhook_url_set", &!self.webhook.current_url().is_empty())
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    ban_repo: Option<Arc<dyn BanRepository>>,
    server_identity: Option<Arc<dyn ServerIdentity>>,
    sessions: Option<Arc<dyn SessionEnforcer>>,
    webhook: Option<Arc<WebhookDispatcher>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ban_repo(mut self, repo: Arc<dyn BanRepository>) -> Self {
        self.ban_repo = Some(repo);
        self
    }

    pub fn server_identity(mut self, identity: Arc<dyn ServerIdentity>) -> Self {
        self.server_identity = Some(identity);
        self
    }

    pub fn sessions(mut self, sessions: Arc<dyn SessionEnforcer>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn webhook(mut self, webhook: Arc<WebhookDispatcher>) -> Self {
        self.webhook = Some(webhook);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.ban_repo.ok_or_else(|| ServiceError::validation("ban_repo is required"))?,
            self.server_identity
                .ok_or_else(|| ServiceError::validation("server_identity is required"))?,
            self.sessions.ok_or_else(|| ServiceError::validation("sessions is required"))?,
            self.webhook.ok_or_else(|| ServiceError::validation("webhook is required"))?,
        ))
    }
}
