//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    engine::DispatchOutcome,
    state::{Phase, Snapshot, TimerState, TimerStatus},
};

/// Serializable view of `TimerState`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    pub phase: Phase,
    pub status: TimerStatus,
    pub remaining_seconds: u64,
    pub initial_seconds: u64,
    pub running: bool,
    pub paused: bool,
    pub progress_percent: u8,
    /// Elapsed share of the phase, `0.0..=1.0`
    pub progress: f64,
}

impl From<&TimerState> for TimerView {
    fn from(state: &TimerState) -> Self {
        Self {
            phase: state.phase,
            status: state.status(),
            remaining_seconds: state.remaining_seconds(),
            initial_seconds: state.initial_duration.as_secs(),
            running: state.running,
            paused: state.paused,
            progress_percent: state.progress_percent(),
            progress: state.progress(),
        }
    }
}

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: TimerStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    pub fn new(message: impl Into<String>, state: &TimerState) -> Self {
        Self {
            status: state.status(),
            message: message.into(),
            timestamp: Utc::now(),
            timer: TimerView::from(state),
        }
    }
}

/// Response for notification action dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub command: String,
    pub outcome: DispatchOutcome,
    pub timestamp: DateTime<Utc>,
    /// State after the command, when an engine is registered
    pub timer: Option<TimerView>,
}

/// Status response with the current snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub snapshot: Snapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
