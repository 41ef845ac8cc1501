//! Read-only journal views, export and reset.

use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use lazyriver_core::journal::{SessionTag, EXPORT_FILE_NAME};
use lazyriver_core::{Event, ValidationError};

use super::{open_store, print_json, CliResult};

#[derive(Args)]
pub struct ExportArgs {
    /// Write to this file instead of stdout (e.g. lazy-river-sessions.csv)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct LogArgs {
    /// Only show sessions with this tag (dinghy, lesson or timer)
    #[arg(long, value_parser = parse_tag)]
    tag: Option<SessionTag>,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Confirm erasing every session, challenge day and victory
    #[arg(long)]
    yes: bool,
}

pub fn today() -> CliResult {
    let store = open_store()?;
    print_json(&store.today_checklist())
}

pub fn stats() -> CliResult {
    let store = open_store()?;
    let challenge = store.challenge_status();
    print_json(&serde_json::json!({
        "streak": store.streak(),
        "sessionsToday": store.today_session_count(),
        "challengeDay": challenge.days_done,
        "challengeTotal": challenge.total,
    }))
}

fn parse_tag(value: &str) -> Result<SessionTag, ValidationError> {
    value.parse()
}

pub fn log(args: LogArgs) -> CliResult {
    let store = open_store()?;
    let sessions: Vec<_> = store
        .state()
        .sessions
        .into_iter()
        .filter(|s| args.tag.map_or(true, |tag| s.tag == tag))
        .collect();
    if sessions.is_empty() {
        match args.tag {
            Some(tag) => println!("No {tag} sessions yet."),
            None => println!("No sessions yet."),
        }
        return Ok(());
    }
    for s in &sessions {
        println!("{} • {} • {} • ~{}s", s.date, s.tag, s.ratio, s.duration_sec);
        if !s.note.is_empty() {
            println!("    {}", s.note);
        }
    }
    Ok(())
}

pub fn export(args: ExportArgs) -> CliResult {
    let store = open_store()?;
    let csv = store.export_sessions_csv()?;
    if csv.is_empty() {
        eprintln!("No sessions to export.");
        return Ok(());
    }
    match args.output {
        Some(path) => {
            std::fs::write(&path, csv)?;
            eprintln!("Exported to {}", path.display());
        }
        None => {
            tracing::debug!("writing CSV to stdout; suggested file name {EXPORT_FILE_NAME}");
            println!("{csv}");
        }
    }
    Ok(())
}

pub fn reset(args: ResetArgs) -> CliResult {
    if !args.yes {
        return Err("reset erases the whole journal; pass --yes to confirm".into());
    }
    let store = open_store()?;
    store.reset_all()?;
    print_json(&Event::JournalReset { at: Utc::now() })
}
