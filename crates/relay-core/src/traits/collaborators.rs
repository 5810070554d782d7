//! Runtime collaborators - sessions, round state, notification delivery and time

use std::time::Duration;

use uuid::Uuid;

use crate::entities::{BanRecord, RoundSnapshot};

/// Enforces bans against currently connected sessions
pub trait SessionEnforcer: Send + Sync {
    /// Disconnect every session matching `ban`, returning the kicked user ids
    fn kick_matching(&self, ban: &BanRecord, source: &str) -> Vec<Uuid>;
}

/// Exposes the current game round
pub trait RoundStateProvider: Send + Sync {
    fn current(&self) -> RoundSnapshot;
}

/// Receives raw notifications from the storage trigger channels.
///
/// Implementations must not block: the listener calls this inline for every
/// payload it receives.
pub trait NotificationHandler: Send + Sync {
    fn on_notification(&self, channel: &str, payload: &str);
}

/// Monotonic time source
pub trait Clock: Send + Sync {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}
