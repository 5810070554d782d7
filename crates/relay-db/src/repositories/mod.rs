//! Repository implementations
//!
//! PostgreSQL implementations of the ports defined in relay-core.

mod ban;
mod error;
mod player;
mod server;

pub use ban::PgBanRepository;
pub use player::PgPlayerLocator;
pub use server::PgServerIdentity;
