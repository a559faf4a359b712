//! The timer engine: sole owner and writer of `TimerState`

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::{
    runtime::Handle,
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, trace};

use crate::{
    state::{Snapshot, SnapshotKind, TimerState, TimerStatus},
    tasks::ticker_task,
};

/// How many snapshots a slow presenter may fall behind before it lags
pub const SNAPSHOT_CHANNEL_CAPACITY: usize = 100;

#[derive(Debug)]
struct EngineInner {
    state: TimerState,
    /// Bumped on every cancel; ticks carrying an older value are dropped
    generation: u64,
    ticker: Option<JoinHandle<()>>,
}

/// Drives the focus/break countdown and publishes snapshots of it.
///
/// All operations are total and may be called from any thread. Mutations are
/// serialized through one lock, and the 1-second ticker runs on the runtime
/// the engine was created on.
#[derive(Debug)]
pub struct TimerEngine {
    inner: Mutex<EngineInner>,
    runtime: Handle,
    this: Weak<TimerEngine>,
    /// Every snapshot, for notification presenters
    snapshot_tx: broadcast::Sender<Snapshot>,
    /// Latest state, for UI observers
    state_tx: watch::Sender<TimerState>,
}

impl TimerEngine {
    /// Create an idle engine on the current tokio runtime.
    ///
    /// Panics if called outside a runtime context; use [`TimerEngine::with_handle`]
    /// to pick the runtime explicitly.
    pub fn new() -> Arc<Self> {
        Self::with_handle(Handle::current())
    }

    pub fn with_handle(runtime: Handle) -> Arc<Self> {
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        let (state_tx, _) = watch::channel(TimerState::new());

        Arc::new_cyclic(|this| Self {
            inner: Mutex::new(EngineInner {
                state: TimerState::new(),
                generation: 0,
                ticker: None,
            }),
            runtime,
            this: this.clone(),
            snapshot_tx,
            state_tx,
        })
    }

    /// Start a fresh focus countdown from its full duration, whatever the
    /// current state.
    pub fn start_focus_session(&self) {
        let mut inner = self.lock();
        self.cancel_ticker(&mut inner);
        inner.state.begin_focus();
        info!("Starting focus session");
        self.publish(&inner.state, SnapshotKind::SessionStarted);
        self.start_locked(&mut inner);
    }

    /// Start or resume the countdown from the current remaining time.
    /// No-op while already running.
    pub fn start_timer(&self) {
        let mut inner = self.lock();
        self.start_locked(&mut inner);
    }

    /// Freeze the countdown. No-op unless running.
    pub fn pause_timer(&self) {
        let mut inner = self.lock();
        self.pause_locked(&mut inner);
    }

    /// Resume when paused, otherwise pause.
    ///
    /// From idle this is a pause request and therefore does nothing; an
    /// explicit start is needed to begin counting.
    pub fn toggle_pause_resume(&self) {
        let mut inner = self.lock();
        if inner.state.is_paused() {
            self.start_locked(&mut inner);
        } else {
            self.pause_locked(&mut inner);
        }
    }

    /// Stop ticking and return to idle focus with a full countdown.
    pub fn reset_timer(&self) {
        let mut inner = self.lock();
        self.cancel_ticker(&mut inner);
        inner.state.reset();
        info!("Timer reset");
        self.publish(&inner.state, SnapshotKind::Reset);
    }

    pub fn state(&self) -> TimerState {
        self.lock().state.clone()
    }

    pub fn status(&self) -> TimerStatus {
        self.lock().state.status()
    }

    /// Snapshot of the current state, labelled by its run status
    pub fn current_snapshot(&self) -> Snapshot {
        let inner = self.lock();
        let kind = match inner.state.status() {
            TimerStatus::Running => SnapshotKind::Running,
            TimerStatus::Paused => SnapshotKind::Paused,
            TimerStatus::Idle => SnapshotKind::Reset,
        };
        Snapshot::capture(&inner.state, kind)
    }

    /// Receive every snapshot emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Observe the latest state.
    ///
    /// The watch value is replaced while the engine lock is held, so do not
    /// keep a `borrow()` alive across calls into the engine; clone the state
    /// out first.
    pub fn watch_state(&self) -> watch::Receiver<TimerState> {
        self.state_tx.subscribe()
    }

    /// Apply one tick issued by the ticker of `generation`.
    ///
    /// Returns false when the tick is stale and the ticker should stop.
    pub(crate) fn on_tick(&self, generation: u64) -> bool {
        let mut inner = self.lock();
        if generation != inner.generation || !inner.state.is_running() {
            trace!("Dropping stale tick from generation {}", generation);
            return false;
        }

        let completed = inner.state.tick();
        trace!("Tick: {}s remaining", inner.state.remaining_seconds());
        self.publish(&inner.state, SnapshotKind::Tick);

        if completed {
            let finished = inner.state.phase;
            let next = inner.state.advance_phase();
            info!("{} phase complete, continuing with {}", finished, next);
            self.publish(&inner.state, SnapshotKind::PhaseComplete);
        }

        true
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> u64 {
        self.lock().generation
    }

    fn start_locked(&self, inner: &mut EngineInner) {
        if !inner.state.start() {
            debug!("Timer already running, start ignored");
            return;
        }

        let generation = inner.generation;
        inner.ticker = Some(self.runtime.spawn(ticker_task(self.this.clone(), generation)));
        info!(
            "Timer running: {} with {}s remaining",
            inner.state.phase,
            inner.state.remaining_seconds()
        );
        self.publish(&inner.state, SnapshotKind::Running);
    }

    fn pause_locked(&self, inner: &mut EngineInner) {
        if !inner.state.pause() {
            debug!("Timer not running, pause ignored");
            return;
        }

        self.cancel_ticker(inner);
        info!("Timer paused with {}s remaining", inner.state.remaining_seconds());
        self.publish(&inner.state, SnapshotKind::Paused);
    }

    fn cancel_ticker(&self, inner: &mut EngineInner) {
        inner.generation = inner.generation.wrapping_add(1);
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
    }

    fn publish(&self, state: &TimerState, kind: SnapshotKind) {
        self.state_tx.send_replace(state.clone());

        if self.snapshot_tx.send(Snapshot::capture(state, kind)).is_err() {
            debug!("No snapshot subscribers for {:?}", kind);
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineInner> {
        // Every mutation completes before the guard drops, so a poisoned
        // state is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    use crate::state::{Phase, BREAK_DURATION, FOCUS_DURATION};

    const HALF_SECOND: Duration = Duration::from_millis(500);

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    /// Drain every snapshot into a shared list as it is emitted
    fn collect(engine: &TimerEngine) -> Arc<Mutex<Vec<Snapshot>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut rx = engine.subscribe();
        tokio::spawn(async move {
            while let Ok(snapshot) = rx.recv().await {
                sink.lock().unwrap().push(snapshot);
            }
        });
        seen
    }

    #[tokio::test(start_paused = true)]
    async fn focus_session_ticks_once_per_second() {
        let engine = TimerEngine::new();
        let mut rx = engine.subscribe();

        engine.start_focus_session();
        let state = engine.state();
        assert_eq!(state.phase, Phase::Focus);
        assert_eq!(state.remaining, FOCUS_DURATION);
        assert_eq!(state.status(), TimerStatus::Running);

        assert_eq!(rx.recv().await.unwrap().kind, SnapshotKind::SessionStarted);
        assert_eq!(rx.recv().await.unwrap().kind, SnapshotKind::Running);

        sleep(secs(1) + HALF_SECOND).await;
        assert_eq!(engine.state().remaining, FOCUS_DURATION - secs(1));

        let tick = rx.recv().await.unwrap();
        assert_eq!(tick.kind, SnapshotKind::Tick);
        assert_eq!(tick.remaining_text, "24:59");
        assert!(!tick.alert);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_flips_phase_and_keeps_ticking() {
        let engine = TimerEngine::new();
        let seen = collect(&engine);

        engine.start_focus_session();
        sleep(FOCUS_DURATION + HALF_SECOND).await;

        let state = engine.state();
        assert_eq!(state.phase, Phase::Break);
        assert_eq!(state.remaining, BREAK_DURATION);
        assert_eq!(state.initial_duration, BREAK_DURATION);
        assert!(state.is_running());

        {
            let seen = seen.lock().unwrap();
            let alerts: Vec<_> = seen.iter().filter(|s| s.alert).collect();
            assert_eq!(alerts.len(), 1);
            assert_eq!(alerts[0].kind, SnapshotKind::PhaseComplete);
            assert_eq!(alerts[0].phase, Phase::Break);
            assert_eq!(alerts[0].remaining_text, "05:00");

            // the zero tick is published before the transition
            let last_tick = seen
                .iter()
                .filter(|s| s.kind == SnapshotKind::Tick)
                .last()
                .unwrap();
            assert_eq!(last_tick.remaining_text, "00:00");
            assert_eq!(last_tick.phase, Phase::Focus);
        }

        sleep(secs(1)).await;
        assert_eq!(engine.state().remaining, BREAK_DURATION - secs(1));

        sleep(BREAK_DURATION).await;
        assert_eq!(engine.state().phase, Phase::Focus);
        assert_eq!(engine.state().remaining, FOCUS_DURATION - secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_and_suppresses_stale_ticks() {
        let engine = TimerEngine::new();
        engine.start_focus_session();
        sleep(secs(3) + HALF_SECOND).await;

        let running_generation = engine.generation();
        engine.pause_timer();

        let paused = engine.state();
        assert_eq!(paused.status(), TimerStatus::Paused);
        assert_eq!(paused.remaining, FOCUS_DURATION - secs(3));

        // a tick from the cancelled ticker must not land
        assert!(!engine.on_tick(running_generation));
        assert_eq!(engine.state(), paused);

        sleep(secs(5)).await;
        assert_eq!(engine.state(), paused);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_resumes_from_frozen_remaining() {
        let engine = TimerEngine::new();
        engine.start_focus_session();
        sleep(secs(2) + HALF_SECOND).await;

        engine.toggle_pause_resume();
        assert_eq!(engine.status(), TimerStatus::Paused);
        let frozen = engine.state().remaining;

        sleep(secs(10)).await;
        engine.toggle_pause_resume();
        let resumed = engine.state();
        assert_eq!(resumed.status(), TimerStatus::Running);
        assert!(!resumed.paused);
        assert_eq!(resumed.remaining, frozen);

        sleep(secs(2) + HALF_SECOND).await;
        assert_eq!(engine.state().remaining, frozen - secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn double_toggle_returns_to_running() {
        let engine = TimerEngine::new();
        engine.start_focus_session();
        sleep(secs(1) + HALF_SECOND).await;
        let before = engine.state();

        engine.toggle_pause_resume();
        engine.toggle_pause_resume();

        assert_eq!(engine.state(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_from_idle_does_nothing() {
        let engine = TimerEngine::new();
        let generation = engine.generation();

        engine.toggle_pause_resume();
        assert_eq!(engine.state(), TimerState::new());
        assert_eq!(engine.generation(), generation);

        sleep(secs(3)).await;
        assert_eq!(engine.status(), TimerStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_start_does_not_double_tick() {
        let engine = TimerEngine::new();
        engine.start_focus_session();
        engine.start_timer();
        engine.start_timer();

        sleep(secs(3) + HALF_SECOND).await;
        assert_eq!(engine.state().remaining, FOCUS_DURATION - secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn start_timer_from_idle_counts_down_loaded_phase() {
        let engine = TimerEngine::new();
        engine.start_timer();
        assert_eq!(engine.status(), TimerStatus::Running);

        sleep(secs(2) + HALF_SECOND).await;
        assert_eq!(engine.state().remaining, FOCUS_DURATION - secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_stops_ticking_from_any_state() {
        let engine = TimerEngine::new();

        engine.start_focus_session();
        sleep(secs(4) + HALF_SECOND).await;
        engine.reset_timer();
        assert_eq!(engine.state(), TimerState::new());

        sleep(secs(3)).await;
        assert_eq!(engine.state(), TimerState::new());

        engine.start_focus_session();
        sleep(secs(1) + HALF_SECOND).await;
        engine.pause_timer();
        engine.reset_timer();
        assert_eq!(engine.state(), TimerState::new());

        engine.reset_timer();
        assert_eq!(engine.state(), TimerState::new());
    }

    #[tokio::test(start_paused = true)]
    async fn focus_session_restarts_from_full_duration() {
        let engine = TimerEngine::new();
        engine.start_focus_session();
        sleep(FOCUS_DURATION + secs(30) + HALF_SECOND).await;
        assert_eq!(engine.state().phase, Phase::Break);

        engine.start_focus_session();
        let state = engine.state();
        assert_eq!(state.phase, Phase::Focus);
        assert_eq!(state.remaining, FOCUS_DURATION);
        assert!(state.is_running());

        sleep(secs(1) + HALF_SECOND).await;
        assert_eq!(engine.state().remaining, FOCUS_DURATION - secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn watchers_see_latest_state() {
        let engine = TimerEngine::new();
        let mut state_rx = engine.watch_state();

        engine.start_focus_session();
        sleep(secs(1) + HALF_SECOND).await;

        assert!(state_rx.has_changed().unwrap());
        assert_eq!(state_rx.borrow_and_update().remaining, FOCUS_DURATION - secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn observer_can_call_engine_after_cloning_watched_state() {
        let engine = TimerEngine::new();
        let mut state_rx = engine.watch_state();
        engine.start_focus_session();

        for _ in 0..3 {
            state_rx.changed().await.unwrap();
            let observed = state_rx.borrow_and_update().clone();
            engine.pause_timer();
            assert_eq!(engine.state().remaining, observed.remaining);
            engine.start_timer();
        }
        assert_eq!(engine.status(), TimerStatus::Running);
    }

    #[test]
    fn operations_from_foreign_threads_share_one_ticker() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        let engine = TimerEngine::with_handle(runtime.handle().clone());

        let starter = Arc::clone(&engine);
        std::thread::spawn(move || starter.start_focus_session())
            .join()
            .unwrap();

        std::thread::sleep(Duration::from_millis(2300));
        let pauser = Arc::clone(&engine);
        std::thread::spawn(move || pauser.toggle_pause_resume())
            .join()
            .unwrap();

        let frozen = engine.state();
        assert_eq!(frozen.status(), TimerStatus::Paused);
        assert_eq!(frozen.remaining, FOCUS_DURATION - secs(2));

        std::thread::sleep(Duration::from_millis(1500));
        assert_eq!(engine.state(), frozen);

        // an even number of toggles lands back on paused
        let toggler = Arc::clone(&engine);
        std::thread::spawn(move || {
            for _ in 0..50 {
                toggler.toggle_pause_resume();
            }
        })
        .join()
        .unwrap();
        assert_eq!(engine.status(), TimerStatus::Paused);
        assert_eq!(engine.state().remaining, frozen.remaining);

        let resumer = Arc::clone(&engine);
        std::thread::spawn(move || resumer.toggle_pause_resume())
            .join()
            .unwrap();

        std::thread::sleep(Duration::from_millis(3500));
        let resumed = engine.state();
        assert_eq!(resumed.status(), TimerStatus::Running);
        assert_eq!(resumed.remaining, frozen.remaining - secs(3));

        drop(engine);
        runtime.shutdown_background();
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_without_subscribers_are_harmless() {
        let engine = TimerEngine::new();
        engine.start_focus_session();
        sleep(secs(5) + HALF_SECOND).await;
        assert_eq!(engine.state().remaining, FOCUS_DURATION - secs(5));
    }
}
