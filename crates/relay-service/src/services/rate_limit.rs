//! Fixed-window rate limiting for incoming notifications.
//!
//! Each notification kind gets its own window. When the window has elapsed the
//! counter restarts at one; otherwise the notification is admitted while the
//! counter stays within capacity. A burst straddling a window boundary can
//! therefore admit up to twice the capacity.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use relay_common::NotificationConfig;
use relay_core::{Clock, NotificationKind};

/// Counter state for one window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitState {
    pub count: u32,
    /// Start of the current window; `None` until the first admission
    pub window_start: Option<Duration>,
}

/// A single fixed-window counter
#[derive(Debug)]
pub struct FixedWindow {
    window: Duration,
    capacity: u32,
    state: Mutex<RateLimitState>,
}

impl FixedWindow {
    pub fn new(window: Duration, capacity: u32) -> Self {
        Self {
            window,
            capacity,
            state: Mutex::new(RateLimitState::default()),
        }
    }

    /// Record an event at `now` and report whether it is admitted
    pub fn admit(&self, now: Duration) -> bool {
        let mut state = self.state.lock();

        let expired = state
            .window_start
            .is_none_or(|start| now >= start.saturating_add(self.window));

        if expired {
            state.count = 1;
            state.window_start = Some(now);
            return true;
        }

        state.count = state.count.saturating_add(1);
        state.count <= self.capacity
    }

    pub fn snapshot(&self) -> RateLimitState {
        *self.state.lock()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

/// Per-kind rate limiter for ban and unban notifications
pub struct NotificationRateLimiter {
    clock: Arc<dyn Clock>,
    ban: FixedWindow,
    unban: FixedWindow,
}

impl NotificationRateLimiter {
    pub fn new(clock: Arc<dyn Clock>, window: Duration, ban_limit: u32, unban_limit: u32) -> Self {
        Self {
            clock,
            ban: FixedWindow::new(window, ban_limit),
            unban: FixedWindow::new(window, unban_limit),
        }
    }

    pub fn from_config(config: &NotificationConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(clock, config.window(), config.ban_limit, config.unban_limit)
    }

    /// Check whether a notification of `kind` may be processed now
    pub fn admit(&self, kind: NotificationKind) -> bool {
        let now = self.clock.now();
        self.window_for(kind).admit(now)
    }

    pub fn window_for(&self, kind: NotificationKind) -> &FixedWindow {
        match kind {
            NotificationKind::Ban => &self.ban,
            NotificationKind::Unban => &self.unban,
        }
    }
}

// ============================================================================
// Clocks
// ============================================================================

/// Wall-independent clock measuring time since construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    pub fn new(start: Duration) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = now.saturating_add(by);
    }

    pub fn set(&self, to: Duration) {
        *self.now.lock() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}
