//! Ban entities - server bans, their address ranges, and unbans

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ConnectedSession;
use crate::error::DomainError;

/// Severity attached to a ban, mirroring admin note severities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoteSeverity {
    None,
    #[default]
    Minor,
    Medium,
    High,
}

impl NoteSeverity {
    /// Integer representation used by the `severity` column
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Minor => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl TryFrom<i32> for NoteSeverity {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Minor),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            other => Err(DomainError::InvalidData(format!("unknown note severity {other}"))),
        }
    }
}

/// An IP range covered by a ban (`address/prefix`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BanAddress {
    pub ip: IpAddr,
    pub prefix: u8,
}

impl BanAddress {
    pub fn new(ip: IpAddr, prefix: u8) -> Self {
        Self { ip, prefix }
    }

    /// Range used when banning a single connection: /32 for IPv4, /64 for IPv6
    #[must_use]
    pub fn for_host(ip: IpAddr) -> Self {
        match ip.to_canonical() {
            v4 @ IpAddr::V4(_) => Self::new(v4, 32),
            v6 @ IpAddr::V6(_) => Self::new(v6, 64),
        }
    }

    /// Check whether `addr` falls within this range.
    ///
    /// IPv4-mapped IPv6 addresses are compared as IPv4. Mixed families never match.
    #[must_use]
    pub fn contains(&self, addr: IpAddr) -> bool {
        match (self.ip.to_canonical(), addr.to_canonical()) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                prefix_eq(u128::from(u32::from(net)), u128::from(u32::from(ip)), self.prefix, 32)
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                prefix_eq(u128::from(net), u128::from(ip), self.prefix, 128)
            }
            _ => false,
        }
    }
}

fn prefix_eq(net: u128, ip: u128, prefix: u8, width: u8) -> bool {
    let prefix = prefix.min(width);
    if prefix == 0 {
        return true;
    }
    let shift = u32::from(width - prefix);
    (net >> shift) == (ip >> shift)
}

impl fmt::Display for BanAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ip, self.prefix)
    }
}

impl FromStr for BanAddress {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ip, prefix) = match s.split_once('/') {
            Some((ip, prefix)) => (ip, Some(prefix)),
            None => (s, None),
        };

        let ip: IpAddr = ip
            .parse()
            .map_err(|_| DomainError::InvalidData(format!("invalid ban address: {s}")))?;
        let width = if ip.is_ipv4() { 32 } else { 128 };
        let prefix = match prefix {
            Some(p) => p
                .parse::<u8>()
                .ok()
                .filter(|p| *p <= width)
                .ok_or_else(|| DomainError::InvalidData(format!("invalid ban prefix: {s}")))?,
            None => width,
        };

        Ok(Self::new(ip, prefix))
    }
}

/// A lifted ban
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbanRecord {
    pub id: i32,
    pub ban_id: i32,
    pub unbanning_admin: Option<Uuid>,
    pub unbanned_at: DateTime<Utc>,
}

/// A server ban as stored in the `server_ban` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRecord {
    pub id: i32,
    pub round_id: Option<i32>,
    pub user_id: Option<Uuid>,
    pub address: Option<BanAddress>,
    pub hwid: Option<Vec<u8>>,
    pub banned_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub reason: String,
    pub severity: NoteSeverity,
    pub banning_admin: Option<Uuid>,
    pub unban: Option<UnbanRecord>,
}

impl BanRecord {
    /// Check if the ban has no expiration time
    #[inline]
    pub fn is_permanent(&self) -> bool {
        self.expires_at.is_none()
    }

    /// A ban is active until it is lifted or expires
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        if self.unban.is_some() {
            return false;
        }
        self.expires_at.is_none_or(|expires| expires > now)
    }

    /// Check whether a connected session falls under this ban.
    ///
    /// Any one of user id, address range or hardware id is enough.
    pub fn matches(&self, session: &ConnectedSession) -> bool {
        if self.user_id == Some(session.user_id) {
            return true;
        }

        if self
            .address
            .is_some_and(|range| range.contains(session.address))
        {
            return true;
        }

        match (&self.hwid, &session.hwid) {
            (Some(banned), Some(hwid)) => !banned.is_empty() && banned == hwid,
            _ => false,
        }
    }
}

/// Data required to insert a new ban
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBan {
    pub user_id: Option<Uuid>,
    pub address: Option<BanAddress>,
    pub hwid: Option<Vec<u8>>,
    pub round_id: Option<i32>,
    /// `None` means permanent
    pub expires_at: Option<DateTime<Utc>>,
    pub reason: String,
    pub severity: NoteSeverity,
    pub banning_admin: Option<Uuid>,
}
