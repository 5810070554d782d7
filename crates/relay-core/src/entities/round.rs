//! Round state - the game round a ban event happened in

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Phase of the game round, as reported by the game host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunLevel {
    PreRoundLobby,
    InRound,
    PostRound,
}

impl RunLevel {
    /// Wire name of the run level
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreRoundLobby => "PreRoundLobby",
            Self::InRound => "InRound",
            Self::PostRound => "PostRound",
        }
    }
}

impl fmt::Display for RunLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PreRoundLobby" => Ok(Self::PreRoundLobby),
            "InRound" => Ok(Self::InRound),
            "PostRound" => Ok(Self::PostRound),
            other => Err(DomainError::UnknownRunLevel(other.to_string())),
        }
    }
}

/// Current round phase and counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSnapshot {
    pub run_level: RunLevel,
    pub round_id: i32,
}

impl RoundSnapshot {
    pub fn new(run_level: RunLevel, round_id: i32) -> Self {
        Self { run_level, round_id }
    }

    /// Human readable round context used in ban notifications
    pub fn describe(&self) -> String {
        match self.run_level {
            // The first round after a restart reports id 0 while in the lobby
            RunLevel::PreRoundLobby if self.round_id == 0 => {
                "pre-round lobby after server restart".to_string()
            }
            RunLevel::PreRoundLobby => {
                format!("pre-round lobby for round {}", i64::from(self.round_id) + 1)
            }
            RunLevel::InRound => format!("round {}", self.round_id),
            RunLevel::PostRound => format!("post-round {}", self.round_id),
        }
    }
}

impl Default for RoundSnapshot {
    fn default() -> Self {
        Self::new(RunLevel::PreRoundLobby, 0)
    }
}
