//! Services
//!
//! The notification path (rate limiter, queue, processor, webhook) plus the
//! in-memory collaborators a game host drives (sessions, round state, chat filter).

pub mod context;
pub mod error;
pub mod moderation;
pub mod notification;
pub mod queue;
pub mod rate_limit;
pub mod round;
pub mod sessions;
pub mod webhook;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use moderation::{AutoModerator, ChatChannel, ChatFilter, ChatMessage, ModerationOutcome};
pub use notification::NotificationProcessor;
pub use queue::{DispatchQueue, DispatchWorker};
pub use rate_limit::{FixedWindow, ManualClock, MonotonicClock, NotificationRateLimiter};
pub use round::SharedRoundState;
pub use sessions::{KickEvent, SessionRegistry};
pub use webhook::{
    build_payload, BanEvent, PayloadTemplate, WebhookDescriptor, WebhookDispatcher,
    WebhookIdentity, WebhookPayload, BAN_COLOR, UNBAN_COLOR,
};

#[cfg(test)]
pub(crate) mod testing;
