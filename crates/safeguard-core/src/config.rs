use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::collaborators::AlarmKind;
use crate::palette::Shortcut;
use crate::state::DEFAULT_GREETING;

pub const REPLY_DELAY_ENV: &str = "SAFEGUARD_REPLY_DELAY_MS";
const DEFAULT_REPLY_DELAY_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("SAFEGUARD_REPLY_DELAY_MS must be a whole number of milliseconds, got {0:?}")]
    InvalidDelay(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub reply_delay_ms: u64,
    pub greeting: Option<String>,
    pub alarm_kind: AlarmKind,
    pub shortcut_key: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
            greeting: None,
            alarm_kind: AlarmKind::default(),
            shortcut_key: Shortcut::default().key,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the user config directory, falling back to defaults when
    /// no file exists, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        let config = Self::load_from(&config_path)?;
        config.with_delay_override(std::env::var(REPLY_DELAY_ENV).ok())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn with_delay_override(mut self, value: Option<String>) -> Result<Self, ConfigError> {
        if let Some(raw) = value {
            self.reply_delay_ms = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidDelay(raw.clone()))?;
        }
        Ok(self)
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    pub fn greeting(&self) -> &str {
        self.greeting.as_deref().unwrap_or(DEFAULT_GREETING)
    }

    pub fn shortcut(&self) -> Shortcut {
        Shortcut {
            key: self.shortcut_key,
        }
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("safeguard").join("config.json"))
    }
}
