//! Configuration structs

mod app_config;
mod phrases;

pub use app_config::{
    AppConfig, AppSettings, ChatFilterConfig, ConfigError, DatabaseConfig, Environment,
    NotificationConfig, ServerConfig, ServerIdentityConfig, WebhookConfig,
};
pub use phrases::ChatFilterPhrases;
