//! Timer state structure and its transitions
//!
//! `TimerState` is the pure countdown machine. It knows nothing about
//! scheduling or presentation; `TimerEngine` drives it and publishes the
//! results.

use std::time::Duration;
use serde::{Deserialize, Serialize};

use super::phase::{Phase, FOCUS_DURATION};

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Which of the three mutually exclusive run states the timer is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

/// Countdown state for the current phase instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining: Duration,
    pub initial_duration: Duration,
    pub running: bool,
    pub paused: bool,
}

impl TimerState {
    /// Create the canonical idle focus state
    pub fn new() -> Self {
        Self {
            phase: Phase::Focus,
            remaining: FOCUS_DURATION,
            initial_duration: FOCUS_DURATION,
            running: false,
            paused: false,
        }
    }

    pub fn status(&self) -> TimerStatus {
        match (self.running, self.paused) {
            (true, _) => TimerStatus::Running,
            (false, true) => TimerStatus::Paused,
            (false, false) => TimerStatus::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        !self.running && self.paused
    }

    /// Load a fresh focus countdown without starting it
    pub fn begin_focus(&mut self) {
        self.enter_phase(Phase::Focus);
        self.running = false;
        self.paused = false;
    }

    /// Start or resume the countdown. Returns false if it was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.paused = false;
        true
    }

    /// Freeze the countdown. Returns false unless it was running.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.paused = true;
        true
    }

    /// Return to idle focus with a full countdown
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Take one second off the countdown.
    ///
    /// Returns true when this tick brought `remaining` to zero. Does nothing
    /// unless running.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(ONE_SECOND);
        self.remaining.is_zero()
    }

    /// Move to the following phase with its full duration loaded.
    /// The run flags are left untouched so a running timer keeps running.
    pub fn advance_phase(&mut self) -> Phase {
        let next = self.phase.next();
        self.enter_phase(next);
        next
    }

    /// Fraction of the current phase already elapsed, in `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.initial_duration.is_zero() {
            return 0.0;
        }
        1.0 - self.remaining.as_secs_f64() / self.initial_duration.as_secs_f64()
    }

    /// Elapsed share of the current phase as a whole percentage (floored)
    pub fn progress_percent(&self) -> u8 {
        let initial = self.initial_duration.as_secs();
        if initial == 0 {
            return 0;
        }
        let elapsed = initial - self.remaining.as_secs().min(initial);
        (elapsed * 100 / initial) as u8
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining.as_secs()
    }

    fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.initial_duration = phase.duration();
        self.remaining = self.initial_duration;
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
