//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Ratio-timer defaults (preset and rounds)
//! - The Emergency Dinghy pacing
//! - Credited lesson length
//! - Presentation toggles
//!
//! Configuration is stored at `<data dir>/config.toml`.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, ValidationError};
use crate::journal::LESSON_DURATION_SECS;
use crate::timer::{BreathConfig, DEFAULT_ROUNDS};

/// Ratio-timer defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default = "default_preset")]
    pub default_preset: String,
}

/// Emergency Dinghy pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DinghyConfig {
    #[serde(default = "default_dinghy_inhale")]
    pub inhale: u32,
    #[serde(default = "default_dinghy_exhale")]
    pub exhale: u32,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

/// Lesson crediting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonConfig {
    /// Seconds recorded for a completed lesson.
    #[serde(default = "default_lesson_duration")]
    pub duration_sec: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_disclaimer: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerSettings,
    #[serde(default)]
    pub dinghy: DinghyConfig,
    #[serde(default)]
    pub lesson: LessonConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// Default functions
fn default_rounds() -> u32 {
    DEFAULT_ROUNDS
}
fn default_preset() -> String {
    BreathConfig::default().ratio()
}
fn default_dinghy_inhale() -> u32 {
    BreathConfig::dinghy().inhale_secs
}
fn default_dinghy_exhale() -> u32 {
    BreathConfig::dinghy().exhale_secs
}
fn default_lesson_duration() -> u64 {
    LESSON_DURATION_SECS
}
fn default_true() -> bool {
    true
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            default_preset: default_preset(),
        }
    }
}

impl Default for DinghyConfig {
    fn default() -> Self {
        Self {
            inhale: default_dinghy_inhale(),
            exhale: default_dinghy_exhale(),
            rounds: default_rounds(),
        }
    }
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            duration_sec: default_lesson_duration(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_disclaimer: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                serde_json::Value::Number(n.into())
            }
            serde_json::Value::Object(_) => return Err(unknown()),
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path. Defaults are written only when the file
    /// does not exist; an unreadable file is left untouched.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| load_failed(e.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default configuration: {e}");
            Self::default()
        })
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key, keeping the previous
    /// config if the result would not validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or does not describe a usable timer.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate().map_err(|e| invalid(e.to_string()))?;
        *self = updated;
        Ok(())
    }

    /// Update a value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Config::apply`] rejects the update or the
    /// config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check that every configured exercise can actually be run.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.dinghy_config()?;
        self.timer_config(None, None)?;
        if self.lesson.duration_sec == 0 {
            return Err(ValidationError::non_positive("lesson.duration_sec"));
        }
        Ok(())
    }

    pub fn dinghy_config(&self) -> Result<BreathConfig, ValidationError> {
        BreathConfig::new(self.dinghy.inhale, self.dinghy.exhale, self.dinghy.rounds)
    }

    /// Ratio-timer configuration, falling back to the configured preset and
    /// round count for whatever is not given.
    pub fn timer_config(
        &self,
        preset: Option<&str>,
        rounds: Option<u32>,
    ) -> Result<BreathConfig, ValidationError> {
        BreathConfig::from_ratio(
            preset.unwrap_or(&self.timer.default_preset),
            rounds.unwrap_or(self.timer.rounds),
        )
    }
}
