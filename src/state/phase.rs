//! Timer phases and their fixed durations

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Nominal length of a focus interval
pub const FOCUS_DURATION: Duration = Duration::from_secs(25 * 60);

/// Nominal length of a break interval
pub const BREAK_DURATION: Duration = Duration::from_secs(5 * 60);

/// One of the two intervals the timer cycles through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    /// Duration of a fresh instance of this phase
    pub fn duration(self) -> Duration {
        match self {
            Phase::Focus => FOCUS_DURATION,
            Phase::Break => BREAK_DURATION,
        }
    }

    /// The phase that follows this one on completion
    pub fn next(self) -> Self {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    /// Title shown while this phase is counting down
    pub fn title(self) -> &'static str {
        match self {
            Phase::Focus => "Focus time",
            Phase::Break => "Break time",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Focus => "focus",
            Phase::Break => "break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
