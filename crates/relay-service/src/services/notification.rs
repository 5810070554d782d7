//! Notification processor
//!
//! Receives ban and unban notifications from the database listener. Rate
//! limiting happens in the caller; everything else runs on the dispatch queue
//! so the listener is never blocked.
//!
//! A ban notification kicks matching sessions (unless the ban came from this
//! server) and announces the ban on the webhook. An unban notification only
//! announces. Records that no longer exist are logged and skipped.

use std::sync::Arc;

use chrono::Utc;
use relay_core::{
    BanNotification, Notification, NotificationHandler, NotificationKind, UnbanNotification,
};
use tracing::{debug, info, instrument, trace, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::queue::DispatchQueue;
use super::rate_limit::NotificationRateLimiter;
use super::webhook::BanEvent;

const KICK_SOURCE: &str = "ban notification";

pub struct NotificationProcessor {
    ctx: ServiceContext,
    limiter: NotificationRateLimiter,
    queue: DispatchQueue,
}

impl NotificationProcessor {
    pub fn new(ctx: ServiceContext, limiter: NotificationRateLimiter, queue: DispatchQueue) -> Self {
        Self {
            ctx,
            limiter,
            queue,
        }
    }

    pub fn on_ban_notification(&self, data: BanNotification) {
        if !self.limiter.admit(NotificationKind::Ban) {
            trace!(ban_id = data.ban_id, "Not processing ban notification due to rate limit");
            return;
        }

        let ctx = self.ctx.clone();
        let queue = self.queue.clone();
        self.queue
            .dispatch("ban notification", process_ban(ctx, queue, data));
    }

    pub fn on_unban_notification(&self, data: UnbanNotification) {
        if !self.limiter.admit(NotificationKind::Unban) {
            trace!(unban_id = data.unban_id, "Not processing unban notification due to rate limit");
            return;
        }

        let ctx = self.ctx.clone();
        let queue = self.queue.clone();
        self.queue
            .dispatch("unban notification", process_unban(ctx, queue, data));
    }
}

impl NotificationHandler for NotificationProcessor {
    fn on_notification(&self, channel: &str, payload: &str) {
        match Notification::parse(channel, payload) {
            Ok(Notification::Ban(data)) => self.on_ban_notification(data),
            Ok(Notification::Unban(data)) => self.on_unban_notification(data),
            Err(e) => warn!(channel, error = %e, "Ignoring malformed notification"),
        }
    }
}

#[instrument(skip(ctx, queue))]
async fn process_ban(
    ctx: ServiceContext,
    queue: DispatchQueue,
    data: BanNotification,
) -> ServiceResult<()> {
    if let Some(origin) = data.server_id {
        if origin == ctx.server_identity().server_id().await? {
            trace!("Not processing ban notification: came from this server");
            return Ok(());
        }
    }

    trace!("Processing ban notification");
    let Some(ban) = ctx.ban_repo().get_ban(data.ban_id).await? else {
        warn!("Ban in notification doesn't exist");
        return Ok(());
    };

    if ban.is_active(Utc::now()) {
        let kicked = ctx.sessions().kick_matching(&ban, KICK_SOURCE);
        if !kicked.is_empty() {
            info!(kicked = kicked.len(), "Kicked sessions matching ban");
        }
    } else {
        debug!("Ban is no longer active, not kicking");
    }

    let webhook = Arc::clone(ctx.webhook());
    queue.dispatch("ban webhook", async move {
        webhook.post_ban_event(&BanEvent::Banned(ban)).await
    });

    Ok(())
}

#[instrument(skip(ctx, queue))]
async fn process_unban(
    ctx: ServiceContext,
    queue: DispatchQueue,
    data: UnbanNotification,
) -> ServiceResult<()> {
    trace!("Processing unban notification");

    let Some(unban) = ctx.ban_repo().get_unban(data.unban_id).await? else {
        warn!("Unban in notification doesn't exist");
        return Ok(());
    };

    let Some(ban) = ctx.ban_repo().get_ban(unban.ban_id).await? else {
        warn!(ban_id = unban.ban_id, "Ban of unban in notification doesn't exist");
        return Ok(());
    };

    let webhook = Arc::clone(ctx.webhook());
    queue.dispatch("unban webhook", async move {
        webhook
            .post_ban_event(&BanEvent::Unbanned { unban, ban })
            .await
    });

    Ok(())
}
