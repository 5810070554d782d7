//! Ban database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A `server_ban` row joined with its optional `server_unban`.
///
/// `address` holds `host(address)` and `address_prefix` holds `masklen(address)`,
/// so the inet column never has to be decoded directly.
#[derive(Debug, Clone, FromRow)]
pub struct BanModel {
    pub ban_id: i32,
    pub round_id: Option<i32>,
    pub player_user_id: Option<Uuid>,
    pub address: Option<String>,
    pub address_prefix: Option<i32>,
    pub hwid: Option<Vec<u8>>,
    pub ban_time: DateTime<Utc>,
    pub expiration_time: Option<DateTime<Utc>>,
    pub reason: String,
    pub severity: i32,
    pub banning_admin: Option<Uuid>,
    pub unban_id: Option<i32>,
    pub unbanning_admin: Option<Uuid>,
    pub unban_time: Option<DateTime<Utc>>,
}

/// Database model for the `server_unban` table
#[derive(Debug, Clone, FromRow)]
pub struct UnbanModel {
    pub unban_id: i32,
    pub ban_id: i32,
    pub unbanning_admin: Option<Uuid>,
    pub unban_time: DateTime<Utc>,
}
