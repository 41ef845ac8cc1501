//! # Lazy River Core Library
//!
//! Core logic for Lazy River Breathing, a guided breathing timer with a
//! local session journal and a 14-day drift challenge. Front ends (the
//! `lazyriver` CLI) are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven in/out/round state machine, plus a
//!   tokio runner that delivers one tick per second
//! - **Journal**: sessions, challenge days and victories kept as one JSON
//!   document behind a pluggable backend
//! - **Storage**: SQLite key-value database and TOML configuration
//!
//! ## Key Components
//!
//! - [`BreathTimer`]: Core timer state machine
//! - [`BreathRunner`]: One-second ticker with idempotent start and cancel-on-drop
//! - [`JournalStore`]: Load-mutate-save journal operations
//! - [`Database`]: SQLite key-value backend for the journal
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod journal;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use journal::{
    Checklist, ChallengeStatus, JournalBackend, JournalDocument, JournalStore, NewSession,
    Session, SessionTag, Victory,
};
pub use storage::{Config, Database};
pub use timer::{BreathConfig, BreathRunner, BreathTimer, Phase, PhaseState};
