//! Breath timer state machine.
//!
//! The timer is a pure, caller-driven state machine. It owns no clock and no
//! thread: something else (see [`BreathRunner`](super::BreathRunner)) calls
//! `tick()` once per second.
//!
//! ## State Transitions
//!
//! ```text
//! In(1,1) -> In(2,1) .. In(a,1) -> Out(1,1) .. Out(b,1) -> In(1,2) .. Out(b,r) -> Done
//! ```
//!
//! A run of `rounds` rounds takes exactly `rounds * (inhale + exhale)` ticks,
//! because `In(1,1)` is already showing before the first tick arrives.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = BreathTimer::new(BreathConfig::dinghy())?
//!     .on_complete(|| println!("Dinghy deployed."));
//! timer.start();
//! while !timer.is_done() {
//!     timer.tick();
//! }
//! ```

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::config::{BreathConfig, Phase};
use crate::error::ValidationError;
use crate::events::Event;

/// Callback fired once, on the tick that completes the final round.
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Observable position of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseState {
    pub phase: Phase,
    pub count: u32,
    pub round: u32,
}

impl PhaseState {
    pub const INITIAL: PhaseState = PhaseState {
        phase: Phase::In,
        count: 1,
        round: 1,
    };
}

impl Default for PhaseState {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Core breath timer.
pub struct BreathTimer {
    config: BreathConfig,
    state: PhaseState,
    running: bool,
    ticks: u64,
    on_complete: Option<CompletionCallback>,
}

impl BreathTimer {
    /// Create a timer for one run, resting at `In(1,1)`.
    ///
    /// # Errors
    /// Returns an error if any configured value is zero.
    pub fn new(config: BreathConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            config,
            state: PhaseState::INITIAL,
            running: false,
            ticks: 0,
            on_complete: None,
        })
    }

    /// Attach the completion callback.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &BreathConfig {
        &self.config
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn count(&self) -> u32 {
        self.state.count
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_done(&self) -> bool {
        self.state.phase == Phase::Done
    }

    /// Ticks applied so far in this run.
    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks
    }

    /// Ticks left before completion.
    pub fn remaining_ticks(&self) -> u64 {
        self.config.duration_secs().saturating_sub(self.ticks)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::BreathSnapshot {
            phase: self.state.phase,
            count: self.state.count,
            round: self.state.round,
            limit: self.config.limit(self.state.phase),
            rounds: self.config.rounds,
            remaining_secs: self.remaining_ticks(),
            running: self.running,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin accepting ticks. A second start, or a start after completion,
    /// is a no-op and returns `None`.
    pub fn start(&mut self) -> Option<Event> {
        if self.running || self.is_done() {
            return None;
        }
        self.running = true;
        tracing::info!(ratio = %self.config.ratio(), rounds = self.config.rounds, "breath run started");
        Some(Event::BreathStarted {
            inhale_secs: self.config.inhale_secs,
            exhale_secs: self.config.exhale_secs,
            rounds: self.config.rounds,
            at: Utc::now(),
        })
    }

    /// Advance by one second. Ticks before `start()` or after completion are
    /// ignored and return `None`; every other tick returns exactly one event.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.ticks += 1;
        let PhaseState {
            phase,
            count,
            round,
        } = self.state;

        if count < self.config.limit(phase) {
            self.state.count = count + 1;
            tracing::debug!(phase = phase.label(), count = count + 1, round, "tick");
            return Some(Event::BreathTick {
                phase,
                count: count + 1,
                round,
                at: Utc::now(),
            });
        }

        match phase {
            Phase::In => Some(self.enter(Phase::Out, round)),
            Phase::Out if round < self.config.rounds => Some(self.enter(Phase::In, round + 1)),
            Phase::Out => Some(self.finish()),
            Phase::Done => None,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, phase: Phase, round: u32) -> Event {
        self.state = PhaseState {
            phase,
            count: 1,
            round,
        };
        tracing::debug!(phase = phase.label(), round, "phase changed");
        Event::PhaseChanged {
            phase,
            round,
            limit: self.config.limit(phase),
            at: Utc::now(),
        }
    }

    fn finish(&mut self) -> Event {
        // count and round keep their final values so the invariants still hold
        self.state.phase = Phase::Done;
        self.running = false;
        tracing::info!(ticks = self.ticks, "breath run completed");
        if let Some(callback) = self.on_complete.take() {
            callback();
        }
        Event::BreathCompleted {
            ratio: self.config.ratio(),
            rounds: self.config.rounds,
            duration_secs: self.config.duration_secs(),
            at: Utc::now(),
        }
    }
}

impl fmt::Debug for BreathTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreathTimer")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("running", &self.running)
            .field("ticks", &self.ticks)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_timer(inhale: u32, exhale: u32, rounds: u32) -> (BreathTimer, Arc<AtomicUsize>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&fired);
        let timer = BreathTimer::new(BreathConfig::new(inhale, exhale, rounds).unwrap())
            .unwrap()
            .on_complete(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            });
        (timer, fired)
    }

    #[test]
    fn starts_at_in_one_one() {
        let timer = BreathTimer::new(BreathConfig::dinghy()).unwrap();
        assert_eq!(timer.state(), PhaseState::INITIAL);
        assert!(!timer.is_running());
    }

    #[test]
    fn ticks_before_start_are_ignored() {
        let mut timer = BreathTimer::new(BreathConfig::dinghy()).unwrap();
        assert!(timer.tick().is_none());
        assert_eq!(timer.state(), PhaseState::INITIAL);
        assert_eq!(timer.ticks_elapsed(), 0);
    }

    #[test]
    fn start_is_idempotent() {
        let mut timer = BreathTimer::new(BreathConfig::dinghy()).unwrap();
        assert!(timer.start().is_some());
        assert!(timer.start().is_none());
        assert!(timer.is_running());
    }

    #[test]
    fn two_four_one_completes_after_six_ticks() {
        let (mut timer, fired) = counting_timer(2, 4, 1);
        timer.start();

        let expected = [
            (Phase::In, 2, 1),
            (Phase::Out, 1, 1),
            (Phase::Out, 2, 1),
            (Phase::Out, 3, 1),
            (Phase::Out, 4, 1),
        ];
        for (phase, count, round) in expected {
            timer.tick();
            assert_eq!(timer.state(), PhaseState { phase, count, round });
            assert_eq!(fired.load(Ordering::SeqCst), 0);
        }

        let last = timer.tick();
        assert!(matches!(last, Some(Event::BreathCompleted { duration_secs: 6, .. })));
        assert!(timer.is_done());
        assert!(!timer.is_running());
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Further ticks have no side effects.
        assert!(timer.tick().is_none());
        assert!(timer.start().is_none());
        assert_eq!(timer.ticks_elapsed(), 6);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rounds_wrap_back_to_inhale() {
        let (mut timer, _) = counting_timer(1, 1, 2);
        timer.start();
        timer.tick();
        assert_eq!(timer.state(), PhaseState { phase: Phase::Out, count: 1, round: 1 });
        let event = timer.tick();
        assert!(matches!(event, Some(Event::PhaseChanged { phase: Phase::In, round: 2, .. })));
        assert_eq!(timer.state(), PhaseState { phase: Phase::In, count: 1, round: 2 });
    }

    #[test]
    fn missing_callback_still_stops() {
        let mut timer = BreathTimer::new(BreathConfig::new(1, 1, 1).unwrap()).unwrap();
        timer.start();
        timer.tick();
        timer.tick();
        assert!(timer.is_done());
        assert_eq!(timer.remaining_ticks(), 0);
    }

    #[test]
    fn snapshot_reports_current_limit() {
        let mut timer = BreathTimer::new(BreathConfig::new(2, 4, 3).unwrap()).unwrap();
        timer.start();
        timer.tick();
        timer.tick();
        match timer.snapshot() {
            Event::BreathSnapshot {
                phase,
                count,
                limit,
                rounds,
                remaining_secs,
                running,
                ..
            } => {
                assert_eq!(phase, Phase::Out);
                assert_eq!(count, 1);
                assert_eq!(limit, 4);
                assert_eq!(rounds, 3);
                assert_eq!(remaining_secs, 16);
                assert!(running);
            }
            _ => panic!("Expected BreathSnapshot"),
        }
    }
}
