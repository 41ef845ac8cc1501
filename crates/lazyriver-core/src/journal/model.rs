//! The persisted journal document and the views derived from it.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::BreathConfig;

/// Fixed key the whole document is stored under.
pub const STORE_KEY: &str = "lrb_store_v1";

/// Length of the drift challenge, in days.
pub const CHALLENGE_DAYS: u32 = 14;

/// Ratio recorded for lessons, which are not paced by the timer.
pub const LESSON_RATIO: &str = "free";

/// Credited length of a completed lesson.
pub const LESSON_DURATION_SECS: u64 = 90;

/// Suggested file name for a saved certificate.
pub const CERTIFICATE_FILE_NAME: &str = "lazy-river-certificate.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionTag {
    Dinghy,
    Lesson,
    Timer,
}

impl SessionTag {
    pub const ALL: [SessionTag; 3] = [SessionTag::Dinghy, SessionTag::Lesson, SessionTag::Timer];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionTag::Dinghy => "dinghy",
            SessionTag::Lesson => "lesson",
            SessionTag::Timer => "timer",
        }
    }
}

impl fmt::Display for SessionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionTag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownTag(s.to_string()))
    }
}

/// One completed exercise. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub date: NaiveDate,
    pub ratio: String,
    pub duration_sec: u64,
    pub tag: SessionTag,
    #[serde(default)]
    pub note: String,
}

/// Fields the caller supplies when saving a session; the store stamps the date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub ratio: String,
    pub duration_sec: u64,
    pub tag: SessionTag,
    pub note: Option<String>,
}

impl NewSession {
    /// Session for a finished timer run.
    pub fn from_config(config: &BreathConfig, tag: SessionTag) -> Self {
        Self {
            ratio: config.ratio(),
            duration_sec: config.duration_secs(),
            tag,
            note: None,
        }
    }

    pub fn lesson(title: &str) -> Self {
        Self {
            ratio: LESSON_RATIO.to_string(),
            duration_sec: LESSON_DURATION_SECS,
            tag: SessionTag::Lesson,
            note: Some(format!("Completed {title}")),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    /// Dates the challenge progressed, each at most once, in marking order.
    #[serde(default)]
    pub days_done: Vec<NaiveDate>,
    #[serde(default = "default_challenge_total")]
    pub total: u32,
}

fn default_challenge_total() -> u32 {
    CHALLENGE_DAYS
}

impl Default for Challenge {
    fn default() -> Self {
        Self {
            days_done: Vec::new(),
            total: CHALLENGE_DAYS,
        }
    }
}

impl Challenge {
    /// Record `date` unless it is already present. Returns whether it was added.
    pub fn mark(&mut self, date: NaiveDate) -> bool {
        if self.days_done.contains(&date) {
            return false;
        }
        self.days_done.push(date);
        true
    }

    pub fn is_complete(&self) -> bool {
        self.days_done.len() >= self.total as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victory {
    pub date: NaiveDate,
    pub text: String,
}

/// The whole persisted journal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalDocument {
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub challenge: Challenge,
    #[serde(default)]
    pub victories: Vec<Victory>,
}

/// What today looks like on the daily checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub dinghy: bool,
    pub lesson: bool,
    pub timer: bool,
    pub challenge_day: usize,
    pub victories: Vec<Victory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStatus {
    pub days_done: usize,
    pub total: u32,
    pub certificate_eligible: bool,
}

/// Issued once every challenge day is done, dated the day it is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub date: NaiveDate,
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lazy River Breathing")?;
        writeln!(f, "{CHALLENGE_DAYS}-Day Drift Complete")?;
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f)?;
        write!(f, "Tiny breaths. Big plot twist.")
    }
}

impl JournalDocument {
    /// The empty document used on first run, after reset, and on corruption.
    pub fn seed() -> Self {
        Self::default()
    }

    pub fn sessions_on(&self, date: NaiveDate) -> impl Iterator<Item = &Session> {
        self.sessions.iter().filter(move |s| s.date == date)
    }

    pub fn checklist(&self, today: NaiveDate) -> Checklist {
        let has_tag = |tag: SessionTag| self.sessions_on(today).any(|s| s.tag == tag);
        Checklist {
            dinghy: has_tag(SessionTag::Dinghy),
            lesson: has_tag(SessionTag::Lesson),
            timer: has_tag(SessionTag::Timer),
            challenge_day: self.challenge.days_done.len(),
            victories: self
                .victories
                .iter()
                .filter(|v| v.date == today)
                .cloned()
                .collect(),
        }
    }

    /// Consecutive days with at least one session, ending today.
    pub fn streak(&self, today: NaiveDate) -> u32 {
        let dates: HashSet<NaiveDate> = self.sessions.iter().map(|s| s.date).collect();
        let mut streak = 0;
        let mut day = today;
        while dates.contains(&day) {
            streak += 1;
            match day.pred_opt() {
                Some(previous) => day = previous,
                None => break,
            }
        }
        streak
    }

    /// The certificate, if the challenge is complete.
    pub fn certificate(&self, today: NaiveDate) -> Option<Certificate> {
        self.challenge
            .is_complete()
            .then_some(Certificate { date: today })
    }

    pub fn challenge_status(&self) -> ChallengeStatus {
        ChallengeStatus {
            days_done: self.challenge.days_done.len(),
            total: self.challenge.total,
            certificate_eligible: self.challenge.is_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn session(day: &str, tag: SessionTag) -> Session {
        Session {
            date: date(day),
            ratio: "3:6".into(),
            duration_sec: 27,
            tag,
            note: String::new(),
        }
    }

    #[test]
    fn seed_serializes_to_the_stored_shape() {
        let json = serde_json::to_value(JournalDocument::seed()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sessions": [],
                "challenge": { "daysDone": [], "total": 14 },
                "victories": []
            })
        );
    }

    #[test]
    fn session_uses_camel_case_and_lowercase_tag() {
        let json = serde_json::to_value(session("2024-01-01", SessionTag::Dinghy)).unwrap();
        assert_eq!(json["durationSec"], 27);
        assert_eq!(json["tag"], "dinghy");
        assert_eq!(json["date"], "2024-01-01");
    }

    #[test]
    fn missing_note_reads_as_empty() {
        let s: Session = serde_json::from_str(
            r#"{"date":"2024-01-01","ratio":"2:4","durationSec":18,"tag":"timer"}"#,
        )
        .unwrap();
        assert_eq!(s.note, "");
    }

    #[test]
    fn tag_parsing() {
        assert_eq!("lesson".parse::<SessionTag>().unwrap(), SessionTag::Lesson);
        assert!(matches!(
            "nap".parse::<SessionTag>(),
            Err(ValidationError::UnknownTag(_))
        ));
    }

    #[test]
    fn challenge_mark_is_set_like() {
        let mut c = Challenge::default();
        assert!(c.mark(date("2024-03-01")));
        assert!(!c.mark(date("2024-03-01")));
        assert_eq!(c.days_done.len(), 1);
    }

    #[test]
    fn challenge_completes_at_fourteen_days() {
        let mut doc = JournalDocument::seed();
        let start = date("2024-03-01");
        for offset in 0..13 {
            doc.challenge.mark(start + chrono::Days::new(offset));
        }
        assert!(!doc.challenge_status().certificate_eligible);
        doc.challenge.mark(start + chrono::Days::new(13));
        let status = doc.challenge_status();
        assert_eq!(status.days_done, 14);
        assert!(status.certificate_eligible);
    }

    #[test]
    fn certificate_only_when_complete() {
        let mut doc = JournalDocument::seed();
        let start = date("2024-03-01");
        for offset in 0..13 {
            doc.challenge.mark(start + chrono::Days::new(offset));
        }
        assert_eq!(doc.certificate(date("2024-03-20")), None);

        doc.challenge.mark(start + chrono::Days::new(13));
        let cert = doc.certificate(date("2024-03-20")).unwrap();
        assert_eq!(
            cert.to_string(),
            "Lazy River Breathing\n14-Day Drift Complete\nDate: 2024-03-20\n\nTiny breaths. Big plot twist."
        );
    }

    #[test]
    fn checklist_only_counts_today() {
        let mut doc = JournalDocument::seed();
        doc.sessions.push(session("2024-05-01", SessionTag::Dinghy));
        doc.sessions.push(session("2024-05-02", SessionTag::Timer));
        doc.victories.push(Victory { date: date("2024-05-01"), text: "old".into() });
        doc.victories.push(Victory { date: date("2024-05-02"), text: "new".into() });
        doc.challenge.mark(date("2024-05-01"));

        let c = doc.checklist(date("2024-05-02"));
        assert!(!c.dinghy);
        assert!(!c.lesson);
        assert!(c.timer);
        assert_eq!(c.challenge_day, 1);
        assert_eq!(c.victories.len(), 1);
        assert_eq!(c.victories[0].text, "new");
    }

    #[test]
    fn streak_walks_back_from_today() {
        let mut doc = JournalDocument::seed();
        assert_eq!(doc.streak(date("2024-05-10")), 0);

        for day in ["2024-05-10", "2024-05-09", "2024-05-09", "2024-05-08", "2024-05-06"] {
            doc.sessions.push(session(day, SessionTag::Timer));
        }
        assert_eq!(doc.streak(date("2024-05-10")), 3);
        // Today missing, yesterday present.
        assert_eq!(doc.streak(date("2024-05-11")), 0);
    }

    #[test]
    fn streak_crosses_month_boundaries() {
        let mut doc = JournalDocument::seed();
        for day in ["2024-03-01", "2024-02-29", "2024-02-28"] {
            doc.sessions.push(session(day, SessionTag::Lesson));
        }
        assert_eq!(doc.streak(date("2024-03-01")), 3);
    }

    #[test]
    fn new_session_from_config() {
        let s = NewSession::from_config(&BreathConfig::default(), SessionTag::Timer);
        assert_eq!(s.ratio, "2:4");
        assert_eq!(s.duration_sec, 18);
        assert_eq!(s.note, None);

        let lesson = NewSession::lesson("Lesson 1");
        assert_eq!(lesson.ratio, "free");
        assert_eq!(lesson.duration_sec, 90);
        assert_eq!(lesson.note.as_deref(), Some("Completed Lesson 1"));
    }
}
