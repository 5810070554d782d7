//! Chat auto-moderation
//!
//! [`ChatFilter`] is a pure phrase matcher. [`AutoModerator`] applies it to chat
//! messages and places a permanent ban on a match. Enforcement of that ban is
//! left to the notification path, like any other ban.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use relay_common::{ChatFilterConfig, ChatFilterPhrases};
use relay_core::{BanAddress, BanRepository, NewBan, NoteSeverity, PlayerLocator};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::error::ServiceResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatChannel {
    #[serde(alias = "ic")]
    InCharacter,
    #[serde(alias = "ooc")]
    OutOfCharacter,
}

impl fmt::Display for ChatChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InCharacter => f.write_str("in_character"),
            Self::OutOfCharacter => f.write_str("out_of_character"),
        }
    }
}

/// Case-insensitive substring matcher over per-channel phrase lists
#[derive(Debug, Clone, Default)]
pub struct ChatFilter {
    in_character: Vec<String>,
    out_of_character: Vec<String>,
}

impl ChatFilter {
    pub fn new(phrases: ChatFilterPhrases) -> Self {
        Self {
            in_character: normalize(phrases.in_character),
            out_of_character: normalize(phrases.out_of_character),
        }
    }

    /// First phrase of `channel`'s list contained in `text`
    pub fn classify(&self, channel: ChatChannel, text: &str) -> Option<&str> {
        let text = text.to_lowercase();
        let phrases = match channel {
            ChatChannel::InCharacter => &self.in_character,
            ChatChannel::OutOfCharacter => &self.out_of_character,
        };

        phrases
            .iter()
            .find(|phrase| text.contains(phrase.as_str()))
            .map(String::as_str)
    }

    pub fn phrase_count(&self) -> usize {
        self.in_character.len() + self.out_of_character.len()
    }
}

// Empty phrases would match every message
fn normalize(phrases: Vec<String>) -> Vec<String> {
    phrases
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.to_lowercase())
        .collect()
}

/// A chat message submitted for moderation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub user_id: Uuid,
    pub username: String,
    pub channel: ChatChannel,
    pub text: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
    Allowed,
    Banned { ban_id: i32, phrase: String },
}

pub struct AutoModerator {
    filter: ChatFilter,
    enabled: AtomicBool,
    ban_reason_prefix: String,
    bans: Arc<dyn BanRepository>,
    players: Arc<dyn PlayerLocator>,
}

impl AutoModerator {
    pub fn new(
        filter: ChatFilter,
        config: &ChatFilterConfig,
        bans: Arc<dyn BanRepository>,
        players: Arc<dyn PlayerLocator>,
    ) -> Self {
        Self {
            filter,
            enabled: AtomicBool::new(config.enabled),
            ban_reason_prefix: config.ban_reason_prefix.clone(),
            bans,
            players,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        info!(enabled, "Chat filter toggled");
    }

    pub fn filter(&self) -> &ChatFilter {
        &self.filter
    }

    /// Classify `message` and ban its sender on a match.
    ///
    /// The ban covers the user id plus the sender's last known address range
    /// and hardware id.
    #[instrument(skip_all, fields(user_id = %message.user_id, channel = %message.channel))]
    pub async fn check_message(&self, message: &ChatMessage) -> ServiceResult<ModerationOutcome> {
        if !self.is_enabled() || message.is_admin {
            return Ok(ModerationOutcome::Allowed);
        }

        let Some(phrase) = self.filter.classify(message.channel, &message.text) else {
            return Ok(ModerationOutcome::Allowed);
        };

        let (address, hwid) = match self.players.lookup_id(message.user_id).await {
            Ok(Some(player)) => (player.last_address.map(BanAddress::for_host), player.last_hwid),
            Ok(None) => (None, None),
            Err(e) => {
                warn!(error = %e, "Failed to look up player, banning by user id only");
                (None, None)
            }
        };

        let ban = NewBan {
            user_id: Some(message.user_id),
            address,
            hwid,
            round_id: None,
            expires_at: None,
            reason: format!("{}{}", self.ban_reason_prefix, message.text),
            severity: NoteSeverity::High,
            banning_admin: None,
        };

        let ban_id = self.bans.create_ban(&ban).await?;
        info!(ban_id, username = %message.username, phrase, "Chat filter banned player");

        Ok(ModerationOutcome::Banned {
            ban_id,
            phrase: phrase.to_string(),
        })
    }
}
