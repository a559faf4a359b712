//! State management module
//!
//! This module contains the countdown state machine, its snapshots, and the
//! shared state handed to the HTTP layer.

pub mod app_state;
pub mod phase;
pub mod snapshot;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use phase::{Phase, BREAK_DURATION, FOCUS_DURATION};
pub use snapshot::{Snapshot, SnapshotKind};
pub use timer_state::{TimerState, TimerStatus};
