//! TOML-based application configuration.
//!
//! Stores timer and watchdog preferences. Configuration is stored at
//! `~/.config/studyflow/config.toml`; every field has a serde default so
//! partial files load cleanly.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{CoreError, PersistenceError, ValidationError};
use crate::session::BreakPolicy;
use crate::watchdog::WatchdogConfig;

/// Timer preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerConfig {
    #[serde(default = "default_short_break")]
    pub short_break: u64,
    #[serde(default = "default_long_break")]
    pub long_break: u64,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
}

/// Idle watchdog thresholds, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchdogSettings {
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,
    #[serde(default = "default_mild_after_secs")]
    pub mild_after_secs: u64,
    #[serde(default = "default_severe_after_secs")]
    pub severe_after_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studyflow/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub watchdog: WatchdogSettings,
    /// Fixed seed for reward-message selection. Entropy when absent.
    #[serde(default)]
    pub reward_seed: Option<u64>,
}

// Default functions
fn default_short_break() -> u64 {
    5
}
fn default_long_break() -> u64 {
    30
}
fn default_sessions_before_long_break() -> u32 {
    3
}
fn default_poll_secs() -> u64 {
    30
}
fn default_mild_after_secs() -> u64 {
    60
}
fn default_severe_after_secs() -> u64 {
    120
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            short_break: default_short_break(),
            long_break: default_long_break(),
            sessions_before_long_break: default_sessions_before_long_break(),
        }
    }
}

impl Default for WatchdogSettings {
    fn default() -> Self {
        Self {
            poll_secs: default_poll_secs(),
            mild_after_secs: default_mild_after_secs(),
            severe_after_secs: default_severe_after_secs(),
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
    ) -> Result<(), ValidationError> {
        let unknown_key = || ValidationError::InvalidValue {
            field: key.to_string(),
            message: "unknown config key".to_string(),
        };
        let bad_value = |message: String| ValidationError::InvalidValue {
            field: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown_key());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown_key)?;
                let existing = obj.get(part).ok_or_else(unknown_key)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| bad_value(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) | serde_json::Value::Null => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(bad_value(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| bad_value(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown_key)?;
        }

        Err(unknown_key())
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

    /// Set a config value by key and persist. Unknown keys and values of
    /// the wrong shape are rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }

    fn path() -> Result<PathBuf, PersistenceError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk; a missing file yields (and writes) the default.
    pub fn load() -> Result<Self, PersistenceError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| PersistenceError::ParseFailed {
                    path,
                    message: e.to_string(),
                })
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), PersistenceError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| PersistenceError::ParseFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content)
            .map_err(|source| PersistenceError::WriteFailed { path, source })
    }

    /// Load from disk, returning default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("config load failed, using defaults: {e}");
            Self::default()
        })
    }

    /// Break parameters for the session controller.
    pub fn break_policy(&self) -> BreakPolicy {
        BreakPolicy {
            short_break_minutes: self.timer.short_break,
            long_break_minutes: self.timer.long_break,
            // A zero cycle length would never grant a long break and
            // would divide by zero; treat it as 1.
            sessions_before_long_break: self.timer.sessions_before_long_break.max(1),
        }
    }

    /// Watchdog thresholds for the session controller.
    pub fn watchdog_config(&self) -> WatchdogConfig {
        WatchdogConfig {
            poll_interval: Duration::from_secs(self.watchdog.poll_secs.max(1)),
            mild_after: Duration::from_secs(self.watchdog.mild_after_secs),
            severe_after: Duration::from_secs(self.watchdog.severe_after_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timer]\nshort_break = 7\n").unwrap();
        assert_eq!(parsed.timer.short_break, 7);
        assert_eq!(parsed.timer.long_break, 30);
        assert_eq!(parsed.watchdog.poll_secs, 30);
        assert_eq!(parsed.reward_seed, None);
    }

    #[test]
    fn zero_cycle_length_is_clamped() {
        let cfg = Config {
            timer: TimerConfig {
                sessions_before_long_break: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(cfg.break_policy().sessions_before_long_break, 1);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.short_break").as_deref(), Some("5"));
        assert_eq!(cfg.get("watchdog.poll_secs").as_deref(), Some("30"));
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "timer.long_break", "20").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "timer.long_break").unwrap(),
            &serde_json::Value::Number(20.into())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        assert!(Config::set_json_value_by_path(&mut json, "timer.nonexistent", "1").is_err());
        assert!(Config::set_json_value_by_path(&mut json, "", "1").is_err());
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "timer.short_break", "not_a_number");
        assert!(result.is_err());
    }

    #[test]
    fn watchdog_config_converts_to_durations() {
        let cfg = Config::default();
        let wd = cfg.watchdog_config();
        assert_eq!(wd.poll_interval, Duration::from_secs(30));
        assert_eq!(wd.mild_after, Duration::from_secs(60));
        assert_eq!(wd.severe_after, Duration::from_secs(120));
    }
}
