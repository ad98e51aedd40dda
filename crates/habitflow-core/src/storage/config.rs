//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - reminder defaults (active flag, exact scheduling, default time)
//! - water tracking goals
//! - step goal
//! - notification behavior
//!
//! Stored at `~/.config/habitflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

use super::data_dir;

/// Reminder defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    /// Master switch; when false no reminders are armed.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Request exact wake-ups (degrades to inexact when denied).
    #[serde(default = "default_true")]
    pub exact: bool,
    #[serde(default = "default_hour")]
    pub default_hour: u32,
    #[serde(default)]
    pub default_minute: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterConfig {
    #[serde(default = "default_water_goal")]
    pub daily_goal_ml: u32,
    #[serde(default = "default_cup")]
    pub cup_ml: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepsConfig {
    #[serde(default = "default_step_goal")]
    pub daily_goal: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub vibration: bool,
}

/// Application configuration, serialized to/from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub reminders: RemindersConfig,
    #[serde(default)]
    pub water: WaterConfig,
    #[serde(default)]
    pub steps: StepsConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_true() -> bool {
    true
}
fn default_hour() -> u32 {
    9
}
fn default_water_goal() -> u32 {
    crate::water::DEFAULT_DAILY_GOAL_ML
}
fn default_cup() -> u32 {
    250
}
fn default_step_goal() -> u32 {
    crate::health::DEFAULT_STEP_GOAL
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            active: true,
            exact: true,
            default_hour: 9,
            default_minute: 0,
        }
    }
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            daily_goal_ml: default_water_goal(),
            cup_ml: default_cup(),
        }
    }
}

impl Default for StepsConfig {
    fn default() -> Self {
        Self {
            daily_goal: default_step_goal(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            vibration: true,
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("~/.config/habitflow"),
                message: e.to_string(),
            })?
            .join("config.toml"))
    }

    /// Load from disk, writing the default file on first run.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be parsed or the
    /// default cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::path()?)
    }

    fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::path()?)
    }

    fn save_to(&self, path: PathBuf) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Read a value by dot-separated key, e.g. `water.daily_goal_ml`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key and persist. The new value must
    /// parse as the existing field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        set_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()
    }
}

fn set_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    let (section, field) = key.split_once('.').ok_or_else(unknown)?;
    let obj = root
        .get_mut(section)
        .and_then(|v| v.as_object_mut())
        .ok_or_else(unknown)?;
    let existing = obj.get(field).ok_or_else(unknown)?;

    let parsed = match existing {
        serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse().map_err(|_| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("cannot parse '{value}' as bool"),
            }
        })?),
        serde_json::Value::Number(_) => {
            let n: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("cannot parse '{value}' as number"),
            })?;
            serde_json::Value::Number(n.into())
        }
        _ => serde_json::Value::String(value.to_string()),
    };
    obj.insert(field.to_string(), parsed);
    Ok(())
}
