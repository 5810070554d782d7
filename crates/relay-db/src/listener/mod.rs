//! Postgres `LISTEN` loop for ban and unban notifications

mod notification_listener;

pub use notification_listener::{
    ListenerConfig, ListenerError, ListenerHandle, ListenerResult, NotificationListener,
};
