//! Debounce timer with explicit idle/armed states.

use std::pin::Pin;
use std::time::Duration;
use tokio::time::{self, Instant, Sleep};

/// Quiet period required after the first change of a burst.
pub const DEFAULT_INITIAL_WINDOW: Duration = Duration::from_secs(5);

/// Quiet period required once a burst keeps producing changes.
pub const DEFAULT_EXTENDED_WINDOW: Duration = Duration::from_secs(10);

/// Idle windows used by a [`DebounceTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceWindows {
    /// Window armed by the first change after a quiet period
    pub initial: Duration,
    /// Window re-armed by every further change before expiry
    pub extended: Duration,
}

impl DebounceWindows {
    pub fn new(initial: Duration, extended: Duration) -> Self {
        Self { initial, extended }
    }
}

impl Default for DebounceWindows {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_WINDOW, DEFAULT_EXTENDED_WINDOW)
    }
}

/// Observable state of a [`DebounceTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// No pending drain
    Idle,
    /// Counting down to a drain at `deadline`
    Armed { deadline: Instant },
}

/// Single reusable timer deciding when a watched tree has gone quiet.
///
/// One `Sleep` handle is reset in place on every change, so a reset racing
/// with an expiry can never leave a stale wakeup behind.
#[derive(Debug)]
pub struct DebounceTimer {
    windows: DebounceWindows,
    state: TimerState,
    sleep: Pin<Box<Sleep>>,
}

impl DebounceTimer {
    /// Create an idle timer. Must be called inside a tokio runtime.
    pub fn new(windows: DebounceWindows) -> Self {
        Self {
            windows,
            state: TimerState::Idle,
            sleep: Box::pin(time::sleep(Duration::ZERO)),
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, TimerState::Armed { .. })
    }

    /// Record a change: arm with the initial window when idle, otherwise
    /// push the deadline out by the extended window. Returns the window used.
    pub fn notify(&mut self) -> Duration {
        let window = match self.state {
            TimerState::Idle => self.windows.initial,
            TimerState::Armed { .. } => self.windows.extended,
        };

        let deadline = Instant::now() + window;
        self.sleep.as_mut().reset(deadline);
        self.state = TimerState::Armed { deadline };
        window
    }

    /// Wait for the armed timer to expire, then return to idle.
    ///
    /// Never completes while idle. Cancel safe: dropping the future before
    /// expiry leaves the timer armed.
    pub async fn expired(&mut self) {
        if !self.is_armed() {
            std::future::pending::<()>().await;
        }

        self.sleep.as_mut().await;
        self.state = TimerState::Idle;
    }
}
