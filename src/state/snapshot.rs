//! Immutable projections of the timer handed to presenters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Phase, TimerState};
use crate::utils::clock::format_countdown;

const PAUSED_TITLE: &str = "Paused";
const SESSION_STARTED_TITLE: &str = "Focus session started";

/// What caused a snapshot to be emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    /// A fresh focus session was requested
    SessionStarted,
    /// The countdown started or resumed
    Running,
    /// One second elapsed
    Tick,
    /// A phase ran out and the next one began
    PhaseComplete,
    Paused,
    Reset,
}

impl SnapshotKind {
    /// Only phase transitions should make noise
    pub fn is_alerting(self) -> bool {
        matches!(self, SnapshotKind::PhaseComplete)
    }
}

/// Presentation-ready view of the timer at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub kind: SnapshotKind,
    pub phase: Phase,
    pub title: String,
    pub remaining_text: String,
    pub remaining_seconds: u64,
    pub progress_percent: u8,
    pub alert: bool,
    pub paused: bool,
    /// Label for the pause/resume notification action
    pub toggle_label: String,
    pub emitted_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn capture(state: &TimerState, kind: SnapshotKind) -> Self {
        let paused = state.is_paused();
        let title = match kind {
            SnapshotKind::SessionStarted => SESSION_STARTED_TITLE,
            _ if paused => PAUSED_TITLE,
            _ => state.phase.title(),
        };

        Self {
            kind,
            phase: state.phase,
            title: title.to_string(),
            remaining_text: format_countdown(state.remaining),
            remaining_seconds: state.remaining_seconds(),
            progress_percent: state.progress_percent(),
            alert: kind.is_alerting(),
            paused,
            toggle_label: if paused { "Resume" } else { "Pause" }.to_string(),
            emitted_at: Utc::now(),
        }
    }
}
