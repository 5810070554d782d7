//! Connected session - a player currently on this server

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A live connection that bans are matched against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedSession {
    pub user_id: Uuid,
    pub username: String,
    pub address: IpAddr,
    pub hwid: Option<Vec<u8>>,
}
