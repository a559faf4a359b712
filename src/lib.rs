//! Pomodoro Timer - A focus/break interval timer
//!
//! This library provides the countdown engine, the process-wide command
//! router used by notification actions, notification presenters, and an
//! HTTP surface for driving the timer.

pub mod api;
pub mod config;
pub mod engine;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use engine::{Command, CommandRouter, DispatchOutcome, TimerEngine};
pub use state::{AppState, Phase, Snapshot, TimerState, TimerStatus};
pub use utils::signals::shutdown_signal;
