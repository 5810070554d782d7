//! # relay-db
//!
//! Database layer implementing the relay's ports with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Ban, player and server repositories
//! - A `LISTEN` loop delivering `ban_notification` / `unban_notification` payloads
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relay_db::{create_pool, DatabaseConfig, NotificationListener, PgBanRepository};
//!
//! async fn example(handler: Arc<dyn NotificationHandler>) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     let bans = PgBanRepository::new(pool.clone());
//!     let listener = NotificationListener::spawn(pool, ListenerConfig::default(), handler);
//!     // ...
//!     listener.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod listener;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use listener::{ListenerConfig, ListenerError, ListenerHandle, NotificationListener};
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool, DEFAULT_MIGRATIONS_DIR};
pub use repositories::{PgBanRepository, PgPlayerLocator, PgServerIdentity};
