//! Background tasks module
//!
//! This module contains the tasks that run alongside the engine: the tick
//! source and the notification presenter loop.

pub mod presenter;
pub mod ticker;

// Re-export main functions
pub use presenter::presenter_task;
pub use ticker::{ticker_task, TICK_INTERVAL};
