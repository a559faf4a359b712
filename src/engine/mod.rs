//! Timer engine module
//!
//! The engine owns the countdown; the command router lets out-of-band
//! triggers reach it without holding a reference.

pub mod router;
pub mod timer_engine;

pub use router::{Command, CommandRouter, DispatchOutcome, UnknownCommand};
pub use timer_engine::TimerEngine;
