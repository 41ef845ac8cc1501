use std::path::PathBuf;

use clap::Subcommand;
use lazyriver_core::journal::CERTIFICATE_FILE_NAME;
use lazyriver_core::Event;

use super::{mark_today, open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// Mark today complete
    Mark,
    /// Days done, total, and certificate availability as JSON
    Status,
    /// Print the 14-Day Drift certificate once every day is done
    Certificate {
        /// Also save it to this file (e.g. lazy-river-certificate.txt)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

pub fn run(action: ChallengeAction) -> CliResult {
    let store = open_store()?;

    match action {
        ChallengeAction::Mark => {
            if let Event::ChallengeMarked {
                added, days_done, ..
            } = mark_today(&store)?
            {
                let total = store.challenge_status().total;
                if added {
                    println!("Marked today complete. ({days_done}/{total})");
                } else {
                    println!("Today was already marked. ({days_done}/{total})");
                }
            }
        }
        ChallengeAction::Status => {
            print_json(&store.challenge_status())?;
        }
        ChallengeAction::Certificate { output } => match store.certificate() {
            Some(cert) => {
                println!("{cert}");
                if let Some(path) = output {
                    std::fs::write(&path, format!("{cert}\n"))?;
                    eprintln!("Saved to {}", path.display());
                } else {
                    tracing::debug!("suggested certificate file name {CERTIFICATE_FILE_NAME}");
                }
            }
            None => {
                let status = store.challenge_status();
                println!("{}/{} done. Keep drifting.", status.days_done, status.total);
            }
        },
    }
    Ok(())
}
