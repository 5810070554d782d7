//! Webhook dispatcher
//!
//! Holds the current webhook target and posts ban and unban messages to it.
//! The target is swapped whenever the configured URL changes; posts read
//! whatever target is current at the time.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use relay_core::{BanRecord, NotificationKind, PlayerLocator, RoundStateProvider, UnbanRecord};
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

use super::payload::{build_payload, PayloadTemplate};
use super::url::WebhookIdentity;
use crate::services::error::{ServiceError, ServiceResult};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// A ban event to announce
#[derive(Debug, Clone)]
pub enum BanEvent {
    Banned(BanRecord),
    Unbanned { unban: UnbanRecord, ban: BanRecord },
}

impl BanEvent {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::Banned(_) => NotificationKind::Ban,
            Self::Unbanned { .. } => NotificationKind::Unban,
        }
    }

    pub fn ban(&self) -> &BanRecord {
        match self {
            Self::Banned(ban) | Self::Unbanned { ban, .. } => ban,
        }
    }

    /// The admin who placed the ban, or who lifted it
    pub fn acting_admin(&self) -> Option<Uuid> {
        match self {
            Self::Banned(ban) => ban.banning_admin,
            Self::Unbanned { unban, .. } => unban.unbanning_admin,
        }
    }
}

/// Webhook object returned by `GET {url}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebhookDescriptor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub guild_id: Option<String>,
}

#[derive(Debug, Default)]
struct WebhookTarget {
    url: String,
    identity: Option<WebhookIdentity>,
}

/// Posts ban events to the configured webhook
pub struct WebhookDispatcher {
    http: Client,
    template: PayloadTemplate,
    target: RwLock<WebhookTarget>,
    players: Arc<dyn PlayerLocator>,
    round: Arc<dyn RoundStateProvider>,
}

impl WebhookDispatcher {
    pub fn new(
        players: Arc<dyn PlayerLocator>,
        round: Arc<dyn RoundStateProvider>,
        template: PayloadTemplate,
    ) -> ServiceResult<Self> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(http, players, round, template))
    }

    pub fn with_client(
        http: Client,
        players: Arc<dyn PlayerLocator>,
        round: Arc<dyn RoundStateProvider>,
        template: PayloadTemplate,
    ) -> Self {
        Self {
            http,
            template,
            target: RwLock::new(WebhookTarget::default()),
            players,
            round,
        }
    }

    /// Currently configured URL; empty when posting is disabled
    pub fn current_url(&self) -> String {
        self.target.read().url.clone()
    }

    /// Identity parsed from the current URL, if it has the Discord shape
    pub fn identity(&self) -> Option<WebhookIdentity> {
        self.target.read().identity.clone()
    }

    /// Apply a new webhook URL.
    ///
    /// The URL is stored even when its shape is not recognised. The webhook
    /// descriptor is fetched to check reachability and returned when valid.
    #[instrument(skip_all)]
    pub async fn on_webhook_changed(&self, url: &str) -> Option<WebhookDescriptor> {
        let identity = WebhookIdentity::parse(url);
        *self.target.write() = WebhookTarget {
            url: url.to_string(),
            identity: identity.clone(),
        };

        if url.is_empty() {
            info!("Ban webhook disabled");
            return None;
        }

        if identity.is_none() {
            warn!("Webhook URL does not appear to be valid, using anyway");
        }

        let descriptor = match self.fetch_descriptor(url).await {
            Ok(descriptor) => descriptor?,
            Err(e) => {
                error!(error = %e, "Failed to fetch webhook data (is the webhook URL valid?)");
                return None;
            }
        };

        if let Some(identity) = &identity {
            if !descriptor_matches(identity, &descriptor) {
                warn!(
                    expected = %identity.id,
                    actual = ?descriptor.id,
                    "Webhook descriptor id does not match the URL"
                );
            }
        }

        info!(
            name = descriptor.name.as_deref().unwrap_or("<unnamed>"),
            "Ban webhook configured"
        );
        Some(descriptor)
    }

    /// `GET` the webhook object. A body that is not a webhook object is discarded.
    pub async fn fetch_descriptor(&self, url: &str) -> ServiceResult<Option<WebhookDescriptor>> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ServiceError::WebhookRejected {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str(&body) {
            Ok(descriptor) => Ok(Some(descriptor)),
            Err(e) => {
                warn!(error = %e, "Discarding malformed webhook data");
                Ok(None)
            }
        }
    }

    /// Post a message for `event`. Does nothing when no webhook is configured.
    #[instrument(skip_all, fields(ban_id = event.ban().id, kind = %event.kind()))]
    pub async fn post_ban_event(&self, event: &BanEvent) -> ServiceResult<()> {
        let (url, recognised) = {
            let target = self.target.read();
            (target.url.clone(), target.identity.is_some())
        };

        if url.is_empty() {
            trace!("No ban webhook configured");
            return Ok(());
        }
        if !recognised {
            debug!("Posting to a webhook URL of unrecognised shape");
        }

        let ban = event.ban();
        let admin = self.resolve_name(event.acting_admin()).await;
        let player = self.resolve_name(ban.user_id).await;

        let payload = build_payload(
            &self.template,
            event.kind(),
            &ban.reason,
            player.as_deref(),
            admin.as_deref(),
            &self.round.current(),
        );

        let response = self
            .http
            .post(post_url(&url)?)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("Posted ban webhook message");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ServiceError::WebhookRejected {
            status: status.as_u16(),
            body,
        })
    }

    /// Apply every URL published on `rx`, starting with the current one
    pub async fn watch_config(self: Arc<Self>, mut rx: watch::Receiver<String>) {
        loop {
            let url = rx.borrow_and_update().clone();
            self.on_webhook_changed(&url).await;

            if rx.changed().await.is_err() {
                debug!("Webhook config channel closed");
                break;
            }
        }
    }

    async fn resolve_name(&self, user_id: Option<Uuid>) -> Option<String> {
        let user_id = user_id?;
        match self.players.lookup_id(user_id).await {
            Ok(player) => player.map(|p| p.username),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to resolve player name");
                None
            }
        }
    }
}

/// `url` with `wait=true` appended to whatever query it already has
fn post_url(url: &str) -> ServiceResult<Url> {
    let mut url = Url::parse(url)
        .map_err(|e| ServiceError::Config(format!("invalid webhook URL: {e}")))?;
    url.query_pairs_mut().append_pair("wait", "true");
    Ok(url)
}

fn descriptor_matches(identity: &WebhookIdentity, descriptor: &WebhookDescriptor) -> bool {
    descriptor
        .id
        .as_deref()
        .is_none_or(|id| id == identity.id)
}
