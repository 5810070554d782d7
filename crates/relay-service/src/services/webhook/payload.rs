//! Webhook message body

use relay_common::WebhookConfig;
use relay_core::{NotificationKind, RoundSnapshot};
use serde::{Deserialize, Serialize};

/// Embed color for a new ban
pub const BAN_COLOR: u32 = 0xFF_00_00;
/// Embed color for a lifted ban
pub const UNBAN_COLOR: u32 = 0x41_F0_97;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Display name the message is posted under
    pub username: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub footer: EmbedFooter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Fallback names and footer branding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadTemplate {
    pub admin_placeholder: String,
    pub player_placeholder: String,
    pub footer_prefix: String,
}

impl Default for PayloadTemplate {
    fn default() -> Self {
        Self::from(&WebhookConfig::default())
    }
}

impl From<&WebhookConfig> for PayloadTemplate {
    fn from(config: &WebhookConfig) -> Self {
        Self {
            admin_placeholder: config.admin_placeholder.clone(),
            player_placeholder: config.player_placeholder.clone(),
            footer_prefix: config.footer_prefix.clone(),
        }
    }
}

/// Build the message for a ban event.
///
/// `admin` and `player` fall back to the template placeholders independently.
pub fn build_payload(
    template: &PayloadTemplate,
    kind: NotificationKind,
    reason: &str,
    player: Option<&str>,
    admin: Option<&str>,
    round: &RoundSnapshot,
) -> WebhookPayload {
    let color = match kind {
        NotificationKind::Ban => BAN_COLOR,
        NotificationKind::Unban => UNBAN_COLOR,
    };

    WebhookPayload {
        username: admin.unwrap_or(&template.admin_placeholder).to_string(),
        embeds: vec![Embed {
            title: player.unwrap_or(&template.player_placeholder).to_string(),
            description: reason.to_string(),
            color,
            footer: EmbedFooter {
                text: format!("{} ({})", template.footer_prefix, round.describe()),
            },
        }],
    }
}
