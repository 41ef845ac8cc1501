mod config;
pub mod database;

pub use config::{Config, DinghyConfig, LessonConfig, TimerSettings, UiConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the application data directory, creating it if needed.
///
/// Resolution order:
/// - `LAZYRIVER_DATA_DIR`, used as-is when set;
/// - `~/.config/lazyriver-dev/` when `LAZYRIVER_ENV=dev`;
/// - `~/.config/lazyriver/` otherwise.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("LAZYRIVER_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("LAZYRIVER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("lazyriver-dev")
            } else {
                base_dir.join("lazyriver")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
