//! PostgreSQL implementation of PlayerLocator

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use relay_core::{LocatedPlayer, PlayerLocator, RepoResult};

use crate::models::PlayerModel;

use super::error::map_db_error;

/// Resolves players from the `player` table
#[derive(Clone)]
pub struct PgPlayerLocator {
    pool: PgPool,
}

impl PgPlayerLocator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<PlayerModel> for LocatedPlayer {
    fn from(model: PlayerModel) -> Self {
        LocatedPlayer {
            user_id: model.user_id,
            username: model.last_seen_user_name,
            // host() output is always a valid address; anything else is dropped
            last_address: model.last_seen_address.and_then(|a| a.parse().ok()),
            last_hwid: model.last_seen_hwid,
        }
    }
}

#[async_trait]
impl PlayerLocator for PgPlayerLocator {
    #[instrument(skip(self))]
    async fn lookup_id(&self, user_id: Uuid) -> RepoResult<Option<LocatedPlayer>> {
        let result = sqlx::query_as::<_, PlayerModel>(
            r"
            SELECT user_id, last_seen_user_name,
                   host(last_seen_address) AS last_seen_address, last_seen_hwid
            FROM player
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(LocatedPlayer::from))
    }
}
