//! The journal store: load-mutate-save operations over one JSON document.
//!
//! Every write reads the full document, applies exactly one mutation and
//! rewrites the full document before returning. Reads never fail: a missing
//! or unreadable document is replaced by the empty seed.

use chrono::NaiveDate;

use super::backend::JournalBackend;
use super::clock::{Clock, SystemClock};
use super::export::sessions_to_csv;
use super::model::{
    Certificate, ChallengeStatus, Checklist, JournalDocument, NewSession, Session, Victory,
};
use crate::error::Result;

pub struct JournalStore<B, C = SystemClock> {
    backend: B,
    clock: C,
}

impl<B: JournalBackend> JournalStore<B> {
    /// Store dated by the system clock.
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<B: JournalBackend, C: Clock> JournalStore<B, C> {
    pub fn with_clock(backend: B, clock: C) -> Self {
        Self { backend, clock }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// The full document.
    pub fn state(&self) -> JournalDocument {
        self.load()
    }

    /// Append a session stamped with today's date.
    pub fn save_session(&self, new: NewSession) -> Result<Session> {
        let today = self.today();
        self.update(|doc| {
            let session = Session {
                date: today,
                ratio: new.ratio,
                duration_sec: new.duration_sec,
                tag: new.tag,
                note: new.note.unwrap_or_default(),
            };
            doc.sessions.push(session.clone());
            tracing::debug!(tag = %session.tag, ratio = %session.ratio, "session saved");
            session
        })
    }

    /// Add today to the challenge days. Returns `false`, without writing,
    /// when today is already recorded.
    pub fn mark_challenge_today(&self) -> Result<bool> {
        let today = self.today();
        let mut doc = self.load();
        if !doc.challenge.mark(today) {
            return Ok(false);
        }
        self.save(&doc)?;
        tracing::debug!(days = doc.challenge.days_done.len(), "challenge day marked");
        Ok(true)
    }

    /// Append a victory stamped with today's date.
    ///
    /// Empty text is the caller's to reject; the store records what it is given.
    pub fn add_victory(&self, text: impl Into<String>) -> Result<Victory> {
        let today = self.today();
        let text = text.into();
        self.update(|doc| {
            let victory = Victory { date: today, text };
            doc.victories.push(victory.clone());
            victory
        })
    }

    pub fn today_checklist(&self) -> Checklist {
        self.load().checklist(self.today())
    }

    pub fn streak(&self) -> u32 {
        self.load().streak(self.today())
    }

    pub fn today_session_count(&self) -> usize {
        self.load().sessions_on(self.today()).count()
    }

    pub fn challenge_status(&self) -> ChallengeStatus {
        self.load().challenge_status()
    }

    /// Today's certificate, or `None` while challenge days remain.
    pub fn certificate(&self) -> Option<Certificate> {
        self.load().certificate(self.today())
    }

    /// All sessions as CSV, or an empty string if there are none.
    pub fn export_sessions_csv(&self) -> Result<String> {
        sessions_to_csv(&self.load().sessions)
    }

    /// Erase the persisted document. The next read returns the seed.
    pub fn reset_all(&self) -> Result<()> {
        self.backend.clear()?;
        tracing::info!("journal reset");
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn load(&self) -> JournalDocument {
        let raw = match self.backend.load() {
            Ok(Some(raw)) => raw,
            Ok(None) => return JournalDocument::seed(),
            Err(e) => {
                tracing::warn!("journal unreadable, using empty journal: {e}");
                return JournalDocument::seed();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("journal corrupt, using empty journal: {e}");
            JournalDocument::seed()
        })
    }

    fn save(&self, doc: &JournalDocument) -> Result<()> {
        let json = serde_json::to_string(doc)?;
        self.backend.save(&json)
    }

    fn update<T>(&self, mutate: impl FnOnce(&mut JournalDocument) -> T) -> Result<T> {
        let mut doc = self.load();
        let out = mutate(&mut doc);
        self.save(&doc)?;
        Ok(out)
    }
}
