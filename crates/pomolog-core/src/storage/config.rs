//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Focus, break and test-run lengths
//! - The placeholder task name
//! - Which log backend receives completed sessions
//! - Spreadsheet connection settings
//! - Sound and theme (cosmetic)
//!
//! Configuration is stored at `~/.config/pomolog/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, ValidationError};
use crate::timer::Durations;

/// Countdown lengths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    #[serde(default = "default_test_seconds")]
    pub test_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Logged when the task name is left blank.
    #[serde(default = "default_task_name")]
    pub default_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogBackend {
    Sqlite,
    Sheets,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_backend")]
    pub backend: LogBackend,
    /// Rows shown by the history view.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

/// Spreadsheet log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_sheets_base_url")]
    pub base_url: String,
    /// Per-request timeout; must be at least 1.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// `ding`, `chime` or `none`.
    #[serde(default = "default_sound")]
    pub sound: String,
    /// `dark` or `light`. Stored for front ends; the CLI ignores it.
    #[serde(default = "default_theme")]
    pub theme: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomolog/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub task: TaskConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// Default functions
fn default_focus_minutes() -> u32 {
    25
}
fn default_break_minutes() -> u32 {
    5
}
fn default_test_seconds() -> u32 {
    5
}
fn default_task_name() -> String {
    "Untitled Task".into()
}
fn default_backend() -> LogBackend {
    LogBackend::Sqlite
}
fn default_history_limit() -> usize {
    5
}
fn default_sheet_name() -> String {
    "Sheet1".into()
}
fn default_token_env() -> String {
    "POMOLOG_SHEETS_TOKEN".into()
}
fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_sound() -> String {
    "ding".into()
}
fn default_theme() -> String {
    "dark".into()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
            test_seconds: default_test_seconds(),
        }
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            default_name: default_task_name(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            history_limit: default_history_limit(),
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            sheet_name: default_sheet_name(),
            token_env: default_token_env(),
            base_url: default_sheets_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sound: default_sound(),
            theme: default_theme(),
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(ConfigError::MissingKey("config key is empty".into()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
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

    /// Check value ranges and enumerated strings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.durations().map_err(|e| match e {
            ValidationError::DurationOutOfRange { field, .. } => ConfigError::InvalidValue {
                key: format!("timer.{field}"),
                message: e.to_string(),
            },
            other => ConfigError::InvalidValue {
                key: "timer".into(),
                message: other.to_string(),
            },
        })?;
        if !matches!(self.ui.sound.as_str(), "ding" | "chime" | "none") {
            return Err(ConfigError::InvalidValue {
                key: "ui.sound".into(),
                message: format!("expected ding, chime or none, got '{}'", self.ui.sound),
            });
        }
        if !matches!(self.ui.theme.as_str(), "dark" | "light") {
            return Err(ConfigError::InvalidValue {
                key: "ui.theme".into(),
                message: format!("expected dark or light, got '{}'", self.ui.theme),
            });
        }
        if self.log.history_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "log.history_limit".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.sheets.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "sheets.timeout_secs".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and validate the result. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the new configuration fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Focus/break/test lengths as a validated [`Durations`].
    pub fn durations(&self) -> Result<Durations, ValidationError> {
        Durations::new(
            self.timer.focus_minutes,
            self.timer.break_minutes,
            self.timer.test_seconds,
        )
    }
}
