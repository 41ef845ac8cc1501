use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lazyriver", version, about = "Lazy River Breathing CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Streak, today's sessions and a disclaimer
    Home,
    /// Run a guided breathing exercise
    Breathe {
        #[command(subcommand)]
        action: commands::breathe::BreatheAction,
    },
    /// Lessons
    Lesson {
        #[command(subcommand)]
        action: commands::lesson::LessonAction,
    },
    /// 14-day drift challenge
    Challenge {
        #[command(subcommand)]
        action: commands::challenge::ChallengeAction,
    },
    /// Petty victory log
    Victory {
        #[command(subcommand)]
        action: commands::victory::VictoryAction,
    },
    /// Today's checklist as JSON
    Today,
    /// Streak and session counts as JSON
    Stats,
    /// Every saved session
    Log(commands::journal::LogArgs),
    /// Export sessions as CSV
    Export(commands::journal::ExportArgs),
    /// Erase the whole journal
    Reset(commands::journal::ResetArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

fn init_tracing() {
    // Logs go to stderr so they don't mix with command output.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lazyriver=warn,lazyriver_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Home => commands::home::run(),
        Commands::Breathe { action } => commands::breathe::run(action),
        Commands::Lesson { action } => commands::lesson::run(action),
        Commands::Challenge { action } => commands::challenge::run(action),
        Commands::Victory { action } => commands::victory::run(action),
        Commands::Today => commands::journal::today(),
        Commands::Stats => commands::journal::stats(),
        Commands::Log(args) => commands::journal::log(args),
        Commands::Export(args) => commands::journal::export(args),
        Commands::Reset(args) => commands::journal::reset(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "lazyriver", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
