//! Session journal: sessions, challenge days and victories, persisted as a
//! single JSON document behind a [`JournalBackend`].

mod backend;
mod clock;
mod export;
mod model;
mod store;

pub use backend::{JournalBackend, MemoryBackend};
pub use clock::{Clock, FixedClock, SystemClock};
pub use export::{sessions_to_csv, CSV_HEADER, EXPORT_FILE_NAME};
pub use model::{
    Certificate, Challenge, ChallengeStatus, Checklist, JournalDocument, NewSession, Session,
    SessionTag, Victory, CERTIFICATE_FILE_NAME, CHALLENGE_DAYS, LESSON_DURATION_SECS,
    LESSON_RATIO, STORE_KEY,
};
pub use store::JournalStore;
