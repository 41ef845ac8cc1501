use chrono::Utc;
use clap::Subcommand;
use lazyriver_core::Event;

use super::{open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum VictoryAction {
    /// Log a petty victory for today
    Add {
        /// e.g. "Held the line at the post office."
        text: String,
    },
    /// Today's victories as JSON
    List,
}

pub fn run(action: VictoryAction) -> CliResult {
    let store = open_store()?;

    match action {
        VictoryAction::Add { text } => {
            let text = text.trim();
            if text.is_empty() {
                return Err("victory text is empty".into());
            }
            let victory = store.add_victory(text)?;
            print_json(&Event::VictoryAdded {
                victory,
                at: Utc::now(),
            })?;
        }
        VictoryAction::List => {
            print_json(&store.today_checklist().victories)?;
        }
    }
    Ok(())
}
