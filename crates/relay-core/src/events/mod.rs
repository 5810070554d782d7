//! Notification events delivered by the database trigger channels

mod notification;

pub use notification::{
    BanNotification, Notification, NotificationKind, UnbanNotification,
    BAN_NOTIFICATION_CHANNEL, UNBAN_NOTIFICATION_CHANNEL,
};
