//! Tick scheduler for [`BreathTimer`].
//!
//! One runner owns one recurring tokio interval. The timer sits behind a
//! mutex shared with the ticking task; cancellation flips a flag while
//! holding that same lock, so once `cancel()` (or `Drop`) returns no tick
//! can mutate the timer again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::engine::{BreathTimer, PhaseState};
use crate::events::Event;

/// The one-second cadence of a breathing run.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

struct Shared {
    timer: Mutex<BreathTimer>,
    cancelled: AtomicBool,
    state_tx: watch::Sender<PhaseState>,
    events_tx: mpsc::UnboundedSender<Event>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, BreathTimer> {
        // A panicking completion callback must not wedge cancellation.
        self.timer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, timer: &BreathTimer, event: Option<Event>) {
        self.state_tx.send_replace(timer.state());
        if let Some(event) = event {
            // Nobody listening is fine.
            let _ = self.events_tx.send(event);
        }
    }

    /// Apply one tick. Returns `false` once the ticker should stop.
    fn apply_tick(&self) -> bool {
        let mut timer = self.lock();
        if self.cancelled.load(Ordering::SeqCst) {
            return false;
        }
        let event = timer.tick();
        self.publish(&timer, event);
        !timer.is_done()
    }
}

/// Drives a [`BreathTimer`] at a fixed period on the tokio runtime.
pub struct BreathRunner {
    shared: Arc<Shared>,
    period: Duration,
    handle: Option<JoinHandle<()>>,
    started: bool,
    events_rx: Option<mpsc::UnboundedReceiver<Event>>,
}

impl BreathRunner {
    /// Wrap a timer with the standard one-second cadence.
    pub fn new(timer: BreathTimer) -> Self {
        Self::with_period(timer, TICK_PERIOD)
    }

    /// Wrap a timer with a custom tick period.
    pub fn with_period(timer: BreathTimer, period: Duration) -> Self {
        let (state_tx, _) = watch::channel(timer.state());
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            shared: Arc::new(Shared {
                timer: Mutex::new(timer),
                cancelled: AtomicBool::new(false),
                state_tx,
                events_tx,
            }),
            period,
            handle: None,
            started: false,
            events_rx: Some(events_rx),
        }
    }

    /// Observe every state the timer passes through.
    pub fn subscribe(&self) -> watch::Receiver<PhaseState> {
        self.shared.state_tx.subscribe()
    }

    /// Take the event stream. Only the first call returns `Some`.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<Event>> {
        self.events_rx.take()
    }

    pub fn state(&self) -> PhaseState {
        self.shared.lock().state()
    }

    pub fn is_done(&self) -> bool {
        self.shared.lock().is_done()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::SeqCst)
    }

    /// Start ticking. Must be called from within a tokio runtime.
    ///
    /// Returns `false` without spawning anything if the runner was already
    /// started, cancelled, or its timer has finished.
    pub fn start(&mut self) -> bool {
        if self.started || self.is_cancelled() {
            return false;
        }
        {
            let mut timer = self.shared.lock();
            let Some(event) = timer.start() else {
                return false;
            };
            self.shared.publish(&timer, Some(event));
        }

        let shared = Arc::clone(&self.shared);
        let period = self.period;
        self.started = true;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !shared.apply_tick() {
                    break;
                }
            }
        }));
        true
    }

    /// Wait for the ticking task to finish, either by completing the run or
    /// by being cancelled.
    pub async fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// Stop all further ticks. Safe to call more than once.
    pub fn cancel(&mut self) {
        {
            let _timer = self.shared.lock();
            if !self.shared.cancelled.swap(true, Ordering::SeqCst) {
                tracing::debug!("breath runner cancelled");
            }
        }
        if let Some(handle) = self.handle.as_ref() {
            handle.abort();
        }
    }
}

impl Drop for BreathRunner {
    fn drop(&mut self) {
        self.cancel();
    }
}
