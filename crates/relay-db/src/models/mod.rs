//! Database models - SQLx-compatible structs for PostgreSQL tables

mod ban;
mod player;

pub use ban::{BanModel, UnbanModel};
pub use player::PlayerModel;
