//! Player entity - what the identity lookup knows about a user

use std::net::IpAddr;

use uuid::Uuid;

/// A player resolved by user id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedPlayer {
    pub user_id: Uuid,
    pub username: String,
    pub last_address: Option<IpAddr>,
    pub last_hwid: Option<Vec<u8>>,
}
