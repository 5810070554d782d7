//! Current round state, updated by the game host

use parking_lot::RwLock;
use relay_core::{RoundSnapshot, RoundStateProvider, RunLevel};
use tracing::info;

#[derive(Debug, Default)]
pub struct SharedRoundState {
    inner: RwLock<RoundSnapshot>,
}

impl SharedRoundState {
    pub fn new(initial: RoundSnapshot) -> Self {
        Self {
            inner: RwLock::new(initial),
        }
    }

    pub fn update(&self, run_level: RunLevel, round_id: i32) {
        *self.inner.write() = RoundSnapshot::new(run_level, round_id);
        info!(%run_level, round_id, "Round state updated");
    }
}

impl RoundStateProvider for SharedRoundState {
    fn current(&self) -> RoundSnapshot {
        *self.inner.read()
    }
}
