//! Ports - the interfaces the service layer depends on

mod collaborators;
mod repositories;

pub use collaborators::{Clock, NotificationHandler, RoundStateProvider, SessionEnforcer};
pub use repositories::{BanRepository, PlayerLocator, RepoResult, ServerIdentity};
