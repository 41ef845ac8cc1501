use clap::Subcommand;
use lazyriver_core::journal::NewSession;
use lazyriver_core::Config;

use super::{mark_today, open_store, CliResult, SAVED_TOAST};

#[derive(Subcommand)]
pub enum LessonAction {
    /// Mark a lesson complete
    Complete {
        /// Lesson title, e.g. "Lesson 1: The Lazy River"
        title: String,
    },
}

pub fn run(action: LessonAction) -> CliResult {
    match action {
        LessonAction::Complete { title } => {
            let title = title.trim();
            if title.is_empty() {
                return Err("lesson title is empty".into());
            }
            let config = Config::load_or_default();
            let session = NewSession {
                duration_sec: config.lesson.duration_sec,
                ..NewSession::lesson(title)
            };
            let store = open_store()?;
            store.save_session(session)?;
            mark_today(&store)?;
            println!("{SAVED_TOAST}");
        }
    }
    Ok(())
}
