//! Domain entities - core business objects

mod ban;
mod player;
mod round;
mod session;

pub use ban::{BanAddress, BanRecord, NewBan, NoteSeverity, UnbanRecord};
pub use player::LocatedPlayer;
pub use round::{RoundSnapshot, RunLevel};
pub use session::ConnectedSession;
