//! Shared state handed to the HTTP layer

use std::{sync::Arc, time::Instant};

use crate::{engine::{CommandRouter, TimerEngine}, utils::clock::format_uptime};

/// The engine and router the API acts on, plus server metadata
#[derive(Debug)]
pub struct AppState {
    /// Direct handle for UI-style controls
    pub engine: Arc<TimerEngine>,
    /// Out-of-band path used by notification actions
    pub router: Arc<CommandRouter>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    pub fn new(engine: Arc<TimerEngine>, router: Arc<CommandRouter>, host: String, port: u16) -> Self {
        Self {
            engine,
            router,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Server uptime as a formatted string
    pub fn uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }
}
