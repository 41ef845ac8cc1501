mod config;
mod engine;
mod runner;

pub use config::{BreathConfig, Phase, DEFAULT_ROUNDS, RATIO_PRESETS};
pub use engine::{BreathTimer, CompletionCallback, PhaseState};
pub use runner::{BreathRunner, TICK_PERIOD};
