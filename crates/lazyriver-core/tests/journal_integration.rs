//! Journal store scenarios against the SQLite backend.

use chrono::{Days, NaiveDate};
use tempfile::TempDir;

use lazyriver_core::journal::{
    FixedClock, JournalBackend, JournalDocument, JournalStore, NewSession, SessionTag, STORE_KEY,
};
use lazyriver_core::storage::database::DB_FILE;
use lazyriver_core::timer::BreathConfig;
use lazyriver_core::Database;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn open(dir: &TempDir, today: NaiveDate) -> JournalStore<Database, FixedClock> {
    let db = Database::open_at(&dir.path().join(DB_FILE)).unwrap();
    JournalStore::with_clock(db, FixedClock(today))
}

fn timer_session() -> NewSession {
    NewSession::from_config(&BreathConfig::default(), SessionTag::Timer)
}

#[test]
fn streak_of_three_with_gap() {
    let dir = tempfile::tempdir().unwrap();
    let today = date("2024-09-10");
    for back in 0..3u64 {
        let store = open(&dir, today - Days::new(back));
        store.save_session(timer_session()).unwrap();
    }
    // Older session beyond the gap at D-3.
    open(&dir, today - Days::new(5)).save_session(timer_session()).unwrap();

    let store = open(&dir, today);
    assert_eq!(store.streak(), 3);

    // No session yet today, but yesterday has one.
    let tomorrow = open(&dir, today + Days::new(1));
    assert_eq!(tomorrow.streak(), 0);
}

#[test]
fn empty_journal_has_no_streak() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir, date("2024-09-10"));
    assert_eq!(store.streak(), 0);
    assert_eq!(store.today_session_count(), 0);
    assert_eq!(store.export_sessions_csv().unwrap(), "");
}

#[test]
fn challenge_day_counted_once_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let today = date("2024-09-10");
    assert!(open(&dir, today).mark_challenge_today().unwrap());
    assert!(!open(&dir, today).mark_challenge_today().unwrap());
    assert!(open(&dir, today + Days::new(1)).mark_challenge_today().unwrap());

    let status = open(&dir, today).challenge_status();
    assert_eq!(status.days_done, 2);
    assert_eq!(status.total, 14);
    assert!(!status.certificate_eligible);
}

#[test]
fn fourteen_days_unlock_certificate() {
    let dir = tempfile::tempdir().unwrap();
    let start = date("2024-02-20");
    for offset in 0..14 {
        let store = open(&dir, start + Days::new(offset));
        store.save_session(NewSession::lesson("Lesson 1")).unwrap();
        store.mark_challenge_today().unwrap();
    }
    let store = open(&dir, start + Days::new(13));
    assert!(store.challenge_status().certificate_eligible);
    assert_eq!(store.streak(), 14);
    let cert = store.certificate().unwrap();
    assert_eq!(cert.date, start + Days::new(13));
    assert!(cert.to_string().starts_with("Lazy River Breathing\n14-Day Drift Complete\n"));
}

#[test]
fn corrupt_stored_document_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir, date("2024-09-10"));
    store.backend().kv_set(STORE_KEY, "[[[").unwrap();

    assert_eq!(store.state(), JournalDocument::seed());
    store.save_session(timer_session()).unwrap();
    assert_eq!(store.state().sessions.len(), 1);
}

#[test]
fn reset_erases_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir, date("2024-09-10"));
    store.save_session(timer_session()).unwrap();
    store.add_victory("kept my cool").unwrap();
    store.mark_challenge_today().unwrap();

    store.reset_all().unwrap();
    assert!(store.backend().load().unwrap().is_none());
    assert_eq!(open(&dir, date("2024-09-10")).state(), JournalDocument::seed());
}

#[test]
fn export_reproduces_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir, date("2024-01-01"));
    store
        .save_session(NewSession::from_config(&BreathConfig::dinghy(), SessionTag::Dinghy).with_note("a,b"))
        .unwrap();

    let csv = store.export_sessions_csv().unwrap();
    assert_eq!(
        csv,
        "date,tag,ratio,durationSec,note\n2024-01-01,dinghy,3:6,27,\"a,b\""
    );
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("date,tag,ratio,durationSec,note"));
    assert_eq!(lines.next(), Some("2024-01-01,dinghy,3:6,27,\"a,b\""));
    assert_eq!(lines.next(), None);
}
