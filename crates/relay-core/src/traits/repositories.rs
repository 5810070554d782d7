//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{BanRecord, LocatedPlayer, NewBan, UnbanRecord};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Ban Repository
// ============================================================================

#[async_trait]
pub trait BanRepository: Send + Sync {
    /// Get a ban by id, including its unban if it was lifted
    async fn get_ban(&self, ban_id: i32) -> RepoResult<Option<BanRecord>>;

    /// Get an unban by id
    async fn get_unban(&self, unban_id: i32) -> RepoResult<Option<UnbanRecord>>;

    /// Insert a new ban and return its id
    async fn create_ban(&self, ban: &NewBan) -> RepoResult<i32>;
}

// ============================================================================
// Player Locator
// ============================================================================

#[async_trait]
pub trait PlayerLocator: Send + Sync {
    /// Resolve a player by user id
    async fn lookup_id(&self, user_id: Uuid) -> RepoResult<Option<LocatedPlayer>>;
}

// ============================================================================
// Server Identity
// ============================================================================

#[async_trait]
pub trait ServerIdentity: Send + Sync {
    /// Id of this server in the shared database
    async fn server_id(&self) -> RepoResult<i32>;
}
