//! # relay-core
//!
//! Domain layer for the ban relay: ban and unban records, the notification wire
//! format delivered by the database, and the traits (ports) through which the
//! service layer reaches storage, sessions, round state and time.
//! This crate has zero dependencies on infrastructure (database, HTTP, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    BanAddress, BanRecord, ConnectedSession, LocatedPlayer, NewBan, NoteSeverity, RoundSnapshot,
    RunLevel, UnbanRecord,
};
pub use error::DomainError;
pub use events::{
    BanNotification, Notification, NotificationKind, UnbanNotification,
    BAN_NOTIFICATION_CHANNEL, UNBAN_NOTIFICATION_CHANNEL,
};
pub use traits::{
    BanRepository, Clock, NotificationHandler, PlayerLocator, RepoResult, RoundStateProvider,
    ServerIdentity, SessionEnforcer,
};
