//! Configuration file parsing and structures.
//!
//! bemfa-sync reads an optional TOML file with logging settings and the bemfa topic
//! name to use for each synced entity.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::filter::Targets;

use crate::error::SyncError;
use crate::topic::default_topic_base;
use crate::topic::topic_name;
use crate::topic::validate_topic_base;
use crate::topic::TopicSuffix;

/// Top-level configuration structure
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Per-entity sync settings, keyed by entity ID
    #[serde(default)]
    pub syncs: HashMap<String, SyncConfig>,
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default)]
    pub level: LogLevel,

    /// Per-target levels, e.g. `bemfa_sync::sync = "trace"`
    #[serde(default)]
    pub overrides: HashMap<String, LogLevel>,
}

impl LoggingConfig {
    /// Build the target filter, raising the default level to at least `floor`.
    pub fn targets(&self, floor: Option<LogLevel>) -> Targets {
        let level = match floor {
            Some(floor) => self.level.min(floor),
            None => self.level,
        };

        self.overrides.iter().fold(
            Targets::new().with_default(LevelFilter::from(level)),
            |targets, (target, level)| {
                targets.with_target(target.clone(), LevelFilter::from(*level))
            },
        )
    }
}

/// Sync settings for a single entity
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// bemfa topic base; the device class suffix is appended
    pub topic: String,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().to_path_buf(), e))?;

        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (entity_id, sync) in &self.syncs {
            validate_topic_base(&sync.topic)
                .map_err(|e| ConfigError::InvalidSync(entity_id.clone(), e))?;
        }
        Ok(())
    }

    /// Topic an entity syncs to: the configured base, or one derived from the entity ID.
    pub fn topic_for(&self, entity_id: &str, suffix: TopicSuffix) -> Result<String, ConfigError> {
        let base = match self.syncs.get(entity_id) {
            Some(sync) => sync.topic.clone(),
            None => default_topic_base(entity_id),
        };

        topic_name(&base, suffix)
            .map_err(|e| ConfigError::InvalidSync(entity_id.to_string(), e))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid sync for {0}: {1}")]
    InvalidSync(String, #[source] SyncError),
}
