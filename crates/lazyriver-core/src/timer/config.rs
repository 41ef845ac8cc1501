use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Rounds used by every built-in exercise.
pub const DEFAULT_ROUNDS: u32 = 3;

/// Ratio-timer presets offered to the user, as `(inhale, exhale)` seconds.
pub const RATIO_PRESETS: [(u32, u32); 3] = [(2, 4), (3, 6), (4, 8)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    In,
    Out,
    Done,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::In => "In",
            Phase::Out => "Out",
            Phase::Done => "Done",
        }
    }
}

/// Configuration for a single breathing run.
///
/// All three values must be at least 1; a zero-length phase has no
/// defined behaviour in the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathConfig {
    pub inhale_secs: u32,
    pub exhale_secs: u32,
    pub rounds: u32,
}

impl BreathConfig {
    /// Build a validated configuration.
    ///
    /// # Errors
    /// Returns `ValidationError::InvalidValue` naming the first field that is zero.
    pub fn new(inhale_secs: u32, exhale_secs: u32, rounds: u32) -> Result<Self, ValidationError> {
        let config = Self {
            inhale_secs,
            exhale_secs,
            rounds,
        };
        config.validate()?;
        Ok(config)
    }

    /// The "Emergency Dinghy": in 3, out 6, three rounds.
    pub fn dinghy() -> Self {
        Self {
            inhale_secs: 3,
            exhale_secs: 6,
            rounds: DEFAULT_ROUNDS,
        }
    }

    /// Parse an `"in:out"` ratio such as `"3:6"`.
    ///
    /// # Errors
    /// Returns `ValidationError::InvalidRatio` if the text is not two positive
    /// integers separated by a colon, or an `InvalidValue` if `rounds` is zero.
    pub fn from_ratio(ratio: &str, rounds: u32) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidRatio(ratio.to_string());
        let (inhale, exhale) = ratio.trim().split_once(':').ok_or_else(invalid)?;
        let inhale_secs: u32 = inhale.trim().parse().map_err(|_| invalid())?;
        let exhale_secs: u32 = exhale.trim().parse().map_err(|_| invalid())?;
        if inhale_secs == 0 || exhale_secs == 0 {
            return Err(invalid());
        }
        Self::new(inhale_secs, exhale_secs, rounds)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.inhale_secs == 0 {
            return Err(ValidationError::non_positive("inhale_secs"));
        }
        if self.exhale_secs == 0 {
            return Err(ValidationError::non_positive("exhale_secs"));
        }
        if self.rounds == 0 {
            return Err(ValidationError::non_positive("rounds"));
        }
        Ok(())
    }

    /// Tick limit for a phase. `Done` has no limit.
    pub fn limit(&self, phase: Phase) -> u32 {
        match phase {
            Phase::In => self.inhale_secs,
            Phase::Out => self.exhale_secs,
            Phase::Done => 0,
        }
    }

    /// Ratio string recorded on the saved session, e.g. `"2:4"`.
    pub fn ratio(&self) -> String {
        format!("{}:{}", self.inhale_secs, self.exhale_secs)
    }

    /// Length of a full run in seconds, which is also its tick count.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn duration_secs(&self) -> u64 {
        (self.inhale_secs as u64)
            .saturating_add(self.exhale_secs as u64)
            .saturating_mul(self.rounds as u64)
    }
}

impl Default for BreathConfig {
    /// First ratio preset (2:4) at the default round count.
    fn default() -> Self {
        let (inhale_secs, exhale_secs) = RATIO_PRESETS[0];
        Self {
            inhale_secs,
            exhale_secs,
            rounds: DEFAULT_ROUNDS,
        }
    }
}
