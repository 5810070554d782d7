//! # relay-service
//!
//! Application layer: turns database ban notifications into session kicks and
//! webhook messages, and runs chat auto-moderation.

pub mod services;

pub use services::{
    build_payload, AutoModerator, BanEvent, ChatChannel, ChatFilter, ChatMessage, DispatchQueue,
    DispatchWorker, FixedWindow, KickEvent, ManualClock, ModerationOutcome, MonotonicClock,
    NotificationProcessor, NotificationRateLimiter, PayloadTemplate, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, SessionRegistry, SharedRoundState,
    WebhookDescriptor, WebhookDispatcher, WebhookIdentity, WebhookPayload, BAN_COLOR, UNBAN_COLOR,
};
