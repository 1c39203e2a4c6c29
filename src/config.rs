use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config directory")]
    NoConfigDir,

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Systemd unit hosting the tuned daemon
    #[serde(default)]
    pub service: ServiceConfig,

    /// Start-and-poll policy applied before daemon calls
    #[serde(default)]
    pub guard: GuardConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Unit name, e.g. "tuned.service"
    #[serde(default = "default_unit")]
    pub unit: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            unit: default_unit(),
        }
    }
}

fn default_unit() -> String {
    "tuned.service".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GuardConfig {
    /// Start the unit when it is found inactive
    #[serde(default = "default_true")]
    pub autostart: bool,

    /// Status checks after a start request before giving up
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    /// Pause between status checks
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            autostart: true,
            poll_attempts: default_poll_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl GuardConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_true() -> bool {
    true
}

fn default_poll_attempts() -> u32 {
    10
}

fn default_poll_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("com", "redhat", "tunedctl")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, falling back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = self.service.unit.trim();
        if unit.is_empty() {
            return Err(ConfigError::ValidationError(
                "service unit cannot be empty".into(),
            ));
        }
        if !unit.ends_with(".service") {
            return Err(ConfigError::ValidationError(format!(
                "service unit must end in .service, got \"{}\"",
                unit
            )));
        }

        if self.guard.poll_attempts == 0 || self.guard.poll_attempts > 600 {
            return Err(ConfigError::ValidationError(
                "guard poll_attempts must be between 1 and 600".into(),
            ));
        }

        if self.guard.poll_interval_ms > 60_000 {
            return Err(ConfigError::ValidationError(
                "guard poll_interval_ms cannot exceed 60000".into(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown log level \"{}\"",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Config saved to: {}", path.display());
        Ok(())
    }
}

/// Settings `tunedctl config` can change; `None` leaves a value as is.
#[derive(Debug, Default)]
pub struct ConfigUpdate {
    pub unit: Option<String>,
    pub autostart: Option<bool>,
    pub poll_attempts: Option<u32>,
    pub poll_interval_ms: Option<u64>,
    pub log_level: Option<String>,
}

impl ConfigUpdate {
    /// Write the set fields into `config`, returning whether any were set.
    pub fn apply_to(self, config: &mut Config) -> bool {
        let mut changed = false;

        if let Some(unit) = self.unit {
            config.service.unit = unit;
            changed = true;
        }

        if let Some(autostart) = self.autostart {
            config.guard.autostart = autostart;
            changed = true;
        }

        if let Some(attempts) = self.poll_attempts {
            config.guard.poll_attempts = attempts;
            changed = true;
        }

        if let Some(interval) = self.poll_interval_ms {
            config.guard.poll_interval_ms = interval;
            changed = true;
        }

        if let Some(level) = self.log_level {
            config.logging.level = level;
            changed = true;
        }

        changed
    }
}

/// Update the config file with `changes`, rejecting invalid results
pub fn update(changes: ConfigUpdate) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if !changes.apply_to(&mut config) {
        println!("No changes specified. Use --show to view current config.");
        return Ok(());
    }

    config.validate()?;
    config.save()?;
    println!("Configuration updated.");

    Ok(())
}

/// Show current configuration
pub fn show() -> anyhow::Result<()> {
    let config = Config::load()?;
    let path = Config::config_path()?;

    println!("Config file: {}\n", path.display());
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
