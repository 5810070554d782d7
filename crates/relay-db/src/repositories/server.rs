//! PostgreSQL implementation of ServerIdentity

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::{info, instrument};

use relay_core::{RepoResult, ServerIdentity};

use super::error::map_db_error;

/// Looks up (or registers) this server's row in the `server` table.
///
/// The id is resolved once and cached for the process lifetime.
pub struct PgServerIdentity {
    pool: PgPool,
    name: String,
    server_id: OnceCell<i32>,
}

impl PgServerIdentity {
    pub fn new(pool: PgPool, name: impl Into<String>) -> Self {
        Self {
            pool,
            name: name.into(),
            server_id: OnceCell::new(),
        }
    }

    /// Name this server registers under
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn register(&self) -> RepoResult<i32> {
        let server_id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO server (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING server_id
            ",
        )
        .bind(&self.name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        info!(server = %self.name, server_id, "Resolved server identity");
        Ok(server_id)
    }
}

#[async_trait]
impl ServerIdentity for PgServerIdentity {
    #[instrument(skip(self), fields(server = %self.name))]
    async fn server_id(&self) -> RepoResult<i32> {
        self.server_id
            .get_or_try_init(|| self.register())
            .await
            .copied()
    }
}
