pub mod breathe;
pub mod challenge;
pub mod config;
pub mod home;
pub mod journal;
pub mod lesson;
pub mod victory;

use lazyriver_core::journal::JournalStore;
use lazyriver_core::storage::Database;
use lazyriver_core::Event;

/// Confirmation shown after every successful save.
pub const SAVED_TOAST: &str = "Saved. Nice drift.";

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn open_store() -> Result<JournalStore<Database>, Box<dyn std::error::Error>> {
    Ok(JournalStore::new(Database::open()?))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Record today as a challenge day and report it as an event.
pub fn mark_today(store: &JournalStore<Database>) -> Result<Event, Box<dyn std::error::Error>> {
    let added = store.mark_challenge_today()?;
    Ok(Event::ChallengeMarked {
        date: store.today(),
        added,
        days_done: store.challenge_status().days_done,
        at: chrono::Utc::now(),
    })
}
