//! Ban and unban notifications.
//!
//! Every committed `server_ban` / `server_unban` row makes the database publish a
//! small JSON object on one of two `NOTIFY` channels, so that every server in the
//! group learns about bans placed elsewhere. The field names below are the wire
//! contract with the trigger functions in `relay-db/migrations`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Channel carrying new bans
pub const BAN_NOTIFICATION_CHANNEL: &str = "ban_notification";
/// Channel carrying new unbans
pub const UNBAN_NOTIFICATION_CHANNEL: &str = "unban_notification";

/// Which notification channel an event arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Ban,
    Unban,
}

impl NotificationKind {
    /// Name of the `NOTIFY` channel for this kind
    #[must_use]
    pub fn channel(self) -> &'static str {
        match self {
            Self::Ban => BAN_NOTIFICATION_CHANNEL,
            Self::Unban => UNBAN_NOTIFICATION_CHANNEL,
        }
    }

    /// Map a channel name back to its kind
    #[must_use]
    pub fn from_channel(name: &str) -> Option<Self> {
        match name {
            BAN_NOTIFICATION_CHANNEL => Some(Self::Ban),
            UNBAN_NOTIFICATION_CHANNEL => Some(Self::Unban),
            _ => None,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ban => f.write_str("ban"),
            Self::Unban => f.write_str("unban"),
        }
    }
}

/// Payload of a single ban notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanNotification {
    /// Id of the new `server_ban` row
    pub ban_id: i32,
    /// Server the ban was placed on.
    ///
    /// Absent when the ban was made outside a game server (e.g. a web admin panel).
    #[serde(default)]
    pub server_id: Option<i32>,
}

/// Payload of a single unban notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbanNotification {
    /// Id of the new `server_unban` row
    pub unban_id: i32,
}

/// A parsed notification from either channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Ban(BanNotification),
    Unban(UnbanNotification),
}

impl Notification {
    /// Parse a raw `NOTIFY` payload received on `channel`
    pub fn parse(channel: &str, payload: &str) -> Result<Self, DomainError> {
        let kind = NotificationKind::from_channel(channel)
            .ok_or_else(|| DomainError::UnknownChannel(channel.to_string()))?;

        let parsed = match kind {
            NotificationKind::Ban => serde_json::from_str(payload).map(Self::Ban),
            NotificationKind::Unban => serde_json::from_str(payload).map(Self::Unban),
        };

        parsed.map_err(|e| DomainError::MalformedPayload(format!("{channel}: {e}")))
    }

    /// Kind of this notification
    #[must_use]
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::Ban(_) => NotificationKind::Ban,
            Self::Unban(_) => NotificationKind::Unban,
        }
    }
}
