//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub admin: ServerConfig,
    pub database: DatabaseConfig,
    pub server: ServerIdentityConfig,
    pub notifications: NotificationConfig,
    pub webhook: WebhookConfig,
    pub chat_filter: ChatFilterConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Admin HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_admin_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations at startup
    #[serde(default)]
    pub run_migrations: bool,
}

/// How this process identifies itself in the shared `server` table
#[derive(Debug, Clone, Deserialize)]
pub struct ServerIdentityConfig {
    #[serde(default = "default_server_name")]
    pub name: String,
}

/// Ban / unban notification handling
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Length of a rate limit window in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Ban notifications processed per window
    #[serde(default = "default_notification_limit")]
    pub ban_limit: u32,
    /// Unban notifications processed per window
    #[serde(default = "default_notification_limit")]
    pub unban_limit: u32,
    /// Delay before the listener reconnects after an error
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

impl NotificationConfig {
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            ban_limit: default_notification_limit(),
            unban_limit: default_notification_limit(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

/// Ban webhook configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Initial webhook URL; empty disables posting
    #[serde(default)]
    pub url: String,
    /// Shown when the acting admin cannot be resolved
    #[serde(default = "default_admin_placeholder")]
    pub admin_placeholder: String,
    /// Shown when the banned player cannot be resolved
    #[serde(default = "default_player_placeholder")]
    pub player_placeholder: String,
    /// Prepended to the round context in the embed footer
    #[serde(default = "default_footer_prefix")]
    pub footer_prefix: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            admin_placeholder: default_admin_placeholder(),
            player_placeholder: default_player_placeholder(),
            footer_prefix: default_footer_prefix(),
        }
    }
}

/// Chat auto-moderation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatFilterConfig {
    #[serde(default)]
    pub enabled: bool,
    /// TOML or JSON file with `in_character` / `out_of_character` phrase lists
    #[serde(default)]
    pub phrases_path: Option<String>,
    /// Ban reason text; the offending message is appended
    #[serde(default = "default_ban_reason_prefix")]
    pub ban_reason_prefix: String,
}

impl Default for ChatFilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            phrases_path: None,
            ban_reason_prefix: default_ban_reason_prefix(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "ban-relay".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_admin_port() -> u16 {
    8090
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_server_name() -> String {
    "unknown".to_string()
}

fn default_window_secs() -> u64 {
    30
}

fn default_notification_limit() -> u32 {
    10
}

fn default_reconnect_delay_ms() -> u64 {
    1000
}

fn default_admin_placeholder() -> String {
    "АДМИН".to_string()
}

fn default_player_placeholder() -> String {
    "ИГРОК".to_string()
}

fn default_footer_prefix() -> String {
    "\u{1f451} Europa+".to_string()
}

fn default_ban_reason_prefix() -> String {
    "Это автоматический бан. Просьба обратиться в дискорд для обжалования. Ключевое сообщение: "
        .to_string()
}

/// Read an optional variable and parse it, failing on unparsable values
fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(None),
    }
}

fn parse_bool<F>(lookup: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue(key, raw)),
        },
        None => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or unparsable
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = match lookup("APP_ENV") {
            Some(raw) => {
                Environment::parse(&raw).ok_or(ConfigError::InvalidValue("APP_ENV", raw))?
            }
            None => Environment::default(),
        };

        let chat_filter_defaults = ChatFilterConfig::default();

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: app_env,
            },
            admin: ServerConfig {
                host: lookup("ADMIN_HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "ADMIN_PORT")?.unwrap_or_else(default_admin_port),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var(&lookup, "DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
                run_migrations: parse_bool(&lookup, "DATABASE_RUN_MIGRATIONS")?.unwrap_or(false),
            },
            server: ServerIdentityConfig {
                name: lookup("SERVER_NAME").unwrap_or_else(default_server_name),
            },
            notifications: NotificationConfig {
                window_secs: parse_var(&lookup, "BAN_NOTIFICATION_WINDOW_SECS")?
                    .unwrap_or_else(default_window_secs),
                ban_limit: parse_var(&lookup, "BAN_NOTIFICATION_LIMIT")?
                    .unwrap_or_else(default_notification_limit),
                unban_limit: parse_var(&lookup, "UNBAN_NOTIFICATION_LIMIT")?
                    .unwrap_or_else(default_notification_limit),
                reconnect_delay_ms: parse_var(&lookup, "LISTENER_RECONNECT_DELAY_MS")?
                    .unwrap_or_else(default_reconnect_delay_ms),
            },
            webhook: WebhookConfig {
                url: lookup("WEBHOOK_URL").unwrap_or_default(),
                admin_placeholder: lookup("WEBHOOK_ADMIN_PLACEHOLDER")
                    .unwrap_or_else(default_admin_placeholder),
                player_placeholder: lookup("WEBHOOK_PLAYER_PLACEHOLDER")
                    .unwrap_or_else(default_player_placeholder),
                footer_prefix: lookup("WEBHOOK_FOOTER_PREFIX")
                    .unwrap_or_else(default_footer_prefix),
            },
            chat_filter: ChatFilterConfig {
                enabled: parse_bool(&lookup, "CHAT_FILTER_ENABLED")?
                    .unwrap_or(chat_filter_defaults.enabled),
                phrases_path: lookup("CHAT_FILTER_PHRASES_PATH").filter(|p| !p.is_empty()),
                ban_reason_prefix: lookup("CHAT_FILTER_BAN_REASON_PREFIX")
                    .unwrap_or(chat_filter_defaults.ban_reason_prefix),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
