//! Webhook URL shape check

use reqwest::Url;

const WEBHOOK_HOSTS: [&str; 3] = ["discord.com", "canary.discord.com", "ptb.discord.com"];

/// Id and token extracted from a Discord webhook URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookIdentity {
    pub id: String,
    pub token: String,
}

impl WebhookIdentity {
    /// Parse `https://{discord.com|canary.discord.com|ptb.discord.com}/api/webhooks/{id}/{token}`.
    ///
    /// Returns `None` for anything else, including a token followed by further
    /// path segments.
    pub fn parse(raw: &str) -> Option<Self> {
        let url = Url::parse(raw).ok()?;

        if url.scheme() != "https"
            || url.port().is_some()
            || !url.username().is_empty()
            || url.password().is_some()
        {
            return None;
        }

        let host = url.host_str()?;
        if !WEBHOOK_HOSTS.contains(&host) {
            return None;
        }

        let mut segments = url.path_segments()?;
        let (Some("api"), Some("webhooks"), Some(id), Some(token), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return None;
        };

        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) || token.is_empty() {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            token: token.to_string(),
        })
    }
}
