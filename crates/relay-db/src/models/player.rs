//! Player database model

use sqlx::FromRow;
use uuid::Uuid;

/// Subset of the `player` table needed for identity lookups
#[derive(Debug, Clone, FromRow)]
pub struct PlayerModel {
    pub user_id: Uuid,
    pub last_seen_user_name: String,
    /// `host(last_seen_address)`
    pub last_seen_address: Option<String>,
    pub last_seen_hwid: Option<Vec<u8>>,
}
