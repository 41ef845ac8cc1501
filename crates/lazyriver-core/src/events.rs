use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::journal::Victory;
use crate::timer::Phase;

/// Every state change in the system produces an Event.
/// The timer emits one per tick; front ends emit the journal ones after a
/// successful write and print or forward them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    BreathStarted {
        inhale_secs: u32,
        exhale_secs: u32,
        rounds: u32,
        at: DateTime<Utc>,
    },
    /// Count advanced within the current phase.
    BreathTick {
        phase: Phase,
        count: u32,
        round: u32,
        at: DateTime<Utc>,
    },
    /// Entered a new phase at count 1.
    PhaseChanged {
        phase: Phase,
        round: u32,
        limit: u32,
        at: DateTime<Utc>,
    },
    BreathCompleted {
        ratio: String,
        rounds: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    BreathSnapshot {
        phase: Phase,
        count: u32,
        round: u32,
        limit: u32,
        rounds: u32,
        remaining_secs: u64,
        running: bool,
        at: DateTime<Utc>,
    },
    ChallengeMarked {
        date: NaiveDate,
        /// False when the date was already recorded.
        added: bool,
        days_done: usize,
        at: DateTime<Utc>,
    },
    VictoryAdded {
        victory: Victory,
        at: DateTime<Utc>,
    },
    JournalReset {
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this event ends a breathing run.
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::BreathCompleted { .. })
    }
}
