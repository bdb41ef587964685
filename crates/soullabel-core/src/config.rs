//! TOML-based application configuration.
//!
//! Stores:
//! - Timing of the cosmetic delays (answer delay, analyzing tick, settle)
//! - Random progress step bounds and an optional fixed seed
//! - An optional replacement quiz file
//!
//! Configuration is stored at `~/.config/soullabel/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, CoreError, Result};
use crate::quiz::QuizData;
use crate::session::{IncrementRange, SessionSettings};

/// Returns `~/.config/soullabel[-dev]/` based on SOULLABEL_ENV.
///
/// Set SOULLABEL_ENV=dev to use the development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SOULLABEL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("soullabel-dev")
    } else {
        base_dir.join("soullabel")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Durations of the cosmetic delays, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_answer_delay")]
    pub answer_delay_ms: u64,
    #[serde(default = "default_analyzing_tick")]
    pub analyzing_tick_ms: u64,
    #[serde(default = "default_stats_settle")]
    pub stats_settle_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_min_increment")]
    pub min_increment: u32,
    #[serde(default = "default_max_increment")]
    pub max_increment: u32,
    /// Fixed RNG seed; a fresh entropy seed is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Quiz file to use instead of the bundled one.
    #[serde(default)]
    pub data_path: Option<PathBuf>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/soullabel/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
}

// Default functions
fn default_answer_delay() -> u64 {
    200
}
fn default_analyzing_tick() -> u64 {
    300
}
fn default_stats_settle() -> u64 {
    100
}
fn default_min_increment() -> u32 {
    1
}
fn default_max_increment() -> u32 {
    15
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            answer_delay_ms: default_answer_delay(),
            analyzing_tick_ms: default_analyzing_tick(),
            stats_settle_ms: default_stats_settle(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_increment: default_min_increment(),
            max_increment: default_max_increment(),
            seed: None,
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
        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let parent = match parent_path {
            Some(path) => path
                .split('.')
                .try_fold(&mut *root, |node, part| node.get_mut(part))
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?,
            None => root,
        };
        let obj = parent
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(leaf)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        // Optional fields serialize as null; "none" clears them.
        let new_value = match existing {
            _ if value.eq_ignore_ascii_case("none") && Self::is_optional(key) => {
                serde_json::Value::Null
            }
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                    .into(),
            ),
            serde_json::Value::Null if key == "simulation.seed" => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                    .into(),
            ),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn is_optional(key: &str) -> bool {
        matches!(key, "simulation.seed" | "quiz.data_path")
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load and validate a config file at an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
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
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not parse as
    /// the existing value's type, or the result fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.min_increment == 0 {
            return Err(ConfigError::InvalidValue {
                key: "simulation.min_increment".into(),
                message: "must be at least 1".into(),
            });
        }
        if sim.min_increment > sim.max_increment {
            return Err(ConfigError::InvalidValue {
                key: "simulation.max_increment".into(),
                message: format!(
                    "must not be smaller than min_increment ({})",
                    sim.min_increment
                ),
            });
        }
        if self.timing.analyzing_tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timing.analyzing_tick_ms".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            answer_delay_ms: self.timing.answer_delay_ms,
            analyzing_tick_ms: self.timing.analyzing_tick_ms,
            stats_settle_ms: self.timing.stats_settle_ms,
            increments: IncrementRange {
                min: self.simulation.min_increment,
                max: self.simulation.max_increment,
            },
        }
    }

    /// The configured quiz file, or the bundled quiz.
    pub fn quiz_data(&self) -> Result<QuizData, CoreError> {
        match &self.quiz.data_path {
            Some(path) => QuizData::load(path),
            None => QuizData::builtin(),
        }
    }
}
