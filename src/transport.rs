//! Host-side transport helpers: speed presets and hold-to-repeat stepping.
//!
//! Both are pure state machines driven by host timestamps, like
//! [`crate::session::PlaybackSession::tick`]: the host polls them from
//! whatever scheduling primitive it owns and applies the result to the
//! session.

use std::time::{Duration, Instant};

/// Cyclic playback-speed presets for a single toggle button.
#[derive(Clone, Copy, Debug)]
pub struct SpeedSteps {
    index: usize,
}

impl SpeedSteps {
    const STEPS: [f64; 4] = [0.5, 1.0, 1.5, 2.0];

    /// Start at normal speed (1.0).
    pub fn new() -> Self {
        Self { index: 1 }
    }

    /// Currently selected speed multiplier.
    pub fn current(&self) -> f64 {
        Self::STEPS[self.index]
    }

    /// Advance to the next preset, wrapping around, and return it.
    pub fn advance(&mut self) -> f64 {
        self.index = (self.index + 1) % Self::STEPS.len();
        self.current()
    }
}

impl Default for SpeedSteps {
    fn default() -> Self {
        Self::new()
    }
}

/// Hold-to-repeat frame stepping.
///
/// Armed when a step button is pressed and dropped on release. No steps
/// are due before an initial delay; after it, one step is due per repeat
/// interval. [`FrameRepeater::poll`] reports the signed steps accumulated
/// since the previous poll, so delivery cadence is up to the host.
#[derive(Clone, Copy, Debug)]
pub struct FrameRepeater {
    direction: i64,
    armed_at: Instant,
    delivered: u64,
}

impl FrameRepeater {
    const INITIAL_DELAY: Duration = Duration::from_millis(300);
    const REPEAT_INTERVAL: Duration = Duration::from_millis(120);

    /// Arm the repeater in the given direction (`+1` forward, `-1` back).
    pub fn arm(direction: i64, now: Instant) -> Self {
        Self {
            direction,
            armed_at: now,
            delivered: 0,
        }
    }

    pub fn direction(&self) -> i64 {
        self.direction
    }

    /// Signed frame steps that became due since the last poll.
    pub fn poll(&mut self, now: Instant) -> i64 {
        let held = now.saturating_duration_since(self.armed_at);
        if held < Self::INITIAL_DELAY {
            return 0;
        }

        let past_delay = held - Self::INITIAL_DELAY;
        let due = 1 + (past_delay.as_millis() / Self::REPEAT_INTERVAL.as_millis()) as u64;
        let fresh = due.saturating_sub(self.delivered);
        self.delivered = due;
        fresh as i64 * self.direction
    }
}
