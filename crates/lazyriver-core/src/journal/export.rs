//! CSV export of the session log.
//!
//! Fields are quoted only when they contain a delimiter, a quote or a line
//! break, with embedded quotes doubled (RFC 4180). Notes are written as-is.
//! Records are separated by `\n`; the last record has no terminator.

use super::model::Session;
use crate::error::{CoreError, Result};

pub const CSV_HEADER: [&str; 5] = ["date", "tag", "ratio", "durationSec", "note"];

/// Suggested file name for a saved export.
pub const EXPORT_FILE_NAME: &str = "lazy-river-sessions.csv";

/// Serialize sessions in insertion order. Returns an empty string when there
/// is nothing to export.
pub fn sessions_to_csv(sessions: &[Session]) -> Result<String> {
    if sessions.is_empty() {
        return Ok(String::new());
    }

    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADER)?;
    for session in sessions {
        wtr.write_record([
            session.date.to_string(),
            session.tag.to_string(),
            session.ratio.clone(),
            session.duration_sec.to_string(),
            session.note.clone(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| CoreError::Custom(e.to_string()))?;
    let mut csv = String::from_utf8(bytes).map_err(|e| CoreError::Custom(e.to_string()))?;
    // The writer terminates every record; only separators are wanted.
    if csv.ends_with('\n') {
        csv.pop();
    }
    Ok(csv)
}
