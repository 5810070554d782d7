//! Session registry
//!
//! Tracks the sessions connected to this server so incoming bans can be enforced
//! against them. Kicks are published on a broadcast channel for the game host.

use std::sync::Arc;

use dashmap::DashMap;
use relay_core::{BanRecord, ConnectedSession, SessionEnforcer};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

const KICK_CHANNEL_CAPACITY: usize = 256;

/// A session removed because it matched a ban
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KickEvent {
    pub user_id: Uuid,
    pub username: String,
    pub reason: String,
}

/// In-memory registry of connected sessions
///
/// Uses `DashMap` for concurrent access to session state.
pub struct SessionRegistry {
    /// Connected sessions by user id
    sessions: DashMap<Uuid, ConnectedSession>,

    kicks: broadcast::Sender<KickEvent>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        let (kicks, _) = broadcast::channel(KICK_CHANNEL_CAPACITY);
        Self {
            sessions: DashMap::new(),
            kicks,
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a session, replacing any previous session of the same user
    pub fn connect(&self, session: ConnectedSession) {
        tracing::debug!(user_id = %session.user_id, username = %session.username, "Session connected");
        self.sessions.insert(session.user_id, session);
    }

    /// Remove a session
    pub fn disconnect(&self, user_id: Uuid) -> Option<ConnectedSession> {
        let removed = self.sessions.remove(&user_id).map(|(_, session)| session);
        if removed.is_some() {
            tracing::debug!(user_id = %user_id, "Session disconnected");
        }
        removed
    }

    pub fn get(&self, user_id: Uuid) -> Option<ConnectedSession> {
        self.sessions.get(&user_id).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Subscribe to kick events
    pub fn subscribe(&self) -> broadcast::Receiver<KickEvent> {
        self.kicks.subscribe()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn kick_reason(ban: &BanRecord, source: &str) -> String {
    format!("Banned (ban #{}, {source}): {}", ban.id, ban.reason)
}

impl SessionEnforcer for SessionRegistry {
    fn kick_matching(&self, ban: &BanRecord, source: &str) -> Vec<Uuid> {
        // Collect first: removing while iterating would deadlock the shard
        let matching: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|entry| ban.matches(entry.value()))
            .map(|entry| *entry.key())
            .collect();

        let reason = kick_reason(ban, source);
        let mut kicked = Vec::with_capacity(matching.len());

        for user_id in matching {
            let Some((_, session)) = self.sessions.remove(&user_id) else {
                continue;
            };

            tracing::info!(
                user_id = %user_id,
                username = %session.username,
                ban_id = ban.id,
                source,
                "Kicking session matching ban"
            );

            // No receivers is fine; the host may not be listening
            let _ = self.kicks.send(KickEvent {
                user_id,
                username: session.username,
                reason: reason.clone(),
            });
            kicked.push(user_id);
        }

        kicked
    }
}
