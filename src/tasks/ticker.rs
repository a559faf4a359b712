//! The 1-second tick source that drives a running countdown

use std::{sync::Weak, time::Duration};
use tokio::time::{interval_at, Instant};
use tracing::debug;

use crate::engine::TimerEngine;

/// Cadence of the countdown
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Deliver ticks to `engine` until it reports the ticker stale or is dropped.
///
/// The first tick fires one full interval after the task starts.
pub async fn ticker_task(engine: Weak<TimerEngine>, generation: u64) {
    debug!("Ticker {} started", generation);

    let mut interval = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);

    loop {
        interval.tick().await;

        let Some(engine) = engine.upgrade() else {
            debug!("Engine dropped, ticker {} exiting", generation);
            break;
        };

        if !engine.on_tick(generation) {
            debug!("Ticker {} superseded, exiting", generation);
            break;
        }
    }
}
