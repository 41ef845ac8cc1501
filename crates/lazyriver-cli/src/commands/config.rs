use clap::Subcommand;
use lazyriver_core::{BreathConfig, Config, ValidationError};
use serde_json::Value;

use super::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dotted key, e.g. "dinghy.inhale" or "timer.default_preset"
        key: String,
    },
    /// Change one setting; values that would break an exercise are refused
    Set {
        /// Dotted key
        key: String,
        /// New value, e.g. "4" or "3:6"
        value: String,
    },
    /// Print every setting as `key = value`
    List,
    /// Restore the default pacing and presets
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| format!("no setting named '{key}' (see `lazyriver config list`)"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {value}");
            println!("{}", pacing_summary(&config));
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in flatten(&serde_json::to_value(&config)?) {
                println!("{key} = {value}");
            }
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("Settings restored. {}", pacing_summary(&config));
        }
    }
    Ok(())
}

fn pacing_summary(config: &Config) -> String {
    format!(
        "Dinghy {}, timer {}.",
        describe(config.dinghy_config()),
        describe(config.timer_config(None, None))
    )
}

fn describe(pacing: Result<BreathConfig, ValidationError>) -> String {
    match pacing {
        Ok(c) => format!("{} x {}", c.ratio(), c.rounds),
        Err(e) => format!("unusable ({e})"),
    }
}

/// Leaf values of a settings tree keyed by dotted path, sorted by key.
fn flatten(value: &Value) -> Vec<(String, String)> {
    fn walk(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
        match value {
            Value::Object(map) => {
                for (name, child) in map {
                    let key = if prefix.is_empty() {
                        name.clone()
                    } else {
                        format!("{prefix}.{name}")
                    };
                    walk(&key, child, out);
                }
            }
            Value::String(s) => out.push((prefix.to_string(), s.clone())),
            other => out.push((prefix.to_string(), other.to_string())),
        }
    }
    let mut out = Vec::new();
    walk("", value, &mut out);
    out
}
