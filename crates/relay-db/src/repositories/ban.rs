//! PostgreSQL implementation of BanRepository

use std::net::IpAddr;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use relay_core::{
    BanAddress, BanRecord, BanRepository, DomainError, NewBan, NoteSeverity, RepoResult,
    UnbanRecord,
};

use crate::models::{BanModel, UnbanModel};

use super::error::{invalid_row, map_db_error};

/// PostgreSQL implementation of BanRepository
#[derive(Clone)]
pub struct PgBanRepository {
    pool: PgPool,
}

impl PgBanRepository {
    /// Create a new PgBanRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TryFrom<BanModel> for BanRecord {
    type Error = DomainError;

    fn try_from(model: BanModel) -> Result<Self, Self::Error> {
        let address = match (model.address, model.address_prefix) {
            (Some(host), Some(prefix)) => {
                let ip: IpAddr = host
                    .parse()
                    .map_err(|_| invalid_row("server_ban", format!("bad address {host}")))?;
                let prefix = u8::try_from(prefix)
                    .map_err(|_| invalid_row("server_ban", format!("bad prefix {prefix}")))?;
                Some(BanAddress::new(ip, prefix))
            }
            _ => None,
        };

        let unban = match (model.unban_id, model.unban_time) {
            (Some(id), Some(unbanned_at)) => Some(UnbanRecord {
                id,
                ban_id: model.ban_id,
                unbanning_admin: model.unbanning_admin,
                unbanned_at,
            }),
            _ => None,
        };

        Ok(BanRecord {
            id: model.ban_id,
            round_id: model.round_id,
            user_id: model.player_user_id,
            address,
            hwid: model.hwid,
            banned_at: model.ban_time,
            expires_at: model.expiration_time,
            reason: model.reason,
            severity: NoteSeverity::try_from(model.severity)?,
            banning_admin: model.banning_admin,
            unban,
        })
    }
}

impl From<UnbanModel> for UnbanRecord {
    fn from(model: UnbanModel) -> Self {
        UnbanRecord {
            id: model.unban_id,
            ban_id: model.ban_id,
            unbanning_admin: model.unbanning_admin,
            unbanned_at: model.unban_time,
        }
    }
}

#[async_trait]
impl BanRepository for PgBanRepository {
    #[instrument(skip(self))]
    async fn get_ban(&self, ban_id: i32) -> RepoResult<Option<BanRecord>> {
        let result = sqlx::query_as::<_, BanModel>(
            r"
            SELECT b.ban_id, b.round_id, b.player_user_id,
                   host(b.address) AS address, masklen(b.address) AS address_prefix,
                   b.hwid, b.ban_time, b.expiration_time, b.reason, b.severity, b.banning_admin,
                   u.unban_id, u.unbanning_admin, u.unban_time
            FROM server_ban b
            LEFT JOIN server_unban u ON u.ban_id = b.ban_id
            WHERE b.ban_id = $1
            ",
        )
        .bind(ban_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(BanRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn get_unban(&self, unban_id: i32) -> RepoResult<Option<UnbanRecord>> {
        let result = sqlx::query_as::<_, UnbanModel>(
            r"
            SELECT unban_id, ban_id, unbanning_admin, unban_time
            FROM server_unban
            WHERE unban_id = $1
            ",
        )
        .bind(unban_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(UnbanRecord::from))
    }

    #[instrument(skip(self, ban), fields(user_id = ?ban.user_id))]
    async fn create_ban(&self, ban: &NewBan) -> RepoResult<i32> {
        let ban_id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO server_ban
                (round_id, player_user_id, address, hwid, expiration_time, reason, severity, banning_admin)
            VALUES ($1, $2, $3::text::inet, $4, $5, $6, $7, $8)
            RETURNING ban_id
            ",
        )
        .bind(ban.round_id)
        .bind(ban.user_id)
        .bind(ban.address.map(|a| a.to_string()))
        .bind(ban.hwid.as_deref())
        .bind(ban.expires_at)
        .bind(&ban.reason)
        .bind(ban.severity.as_i32())
        .bind(ban.banning_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ban_id)
    }
}
