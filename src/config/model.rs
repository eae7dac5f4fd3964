// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::config::validate::validate_config;
use crate::errors::{GlobwatchError, Result};

/// Poll interval used when neither the config file nor the CLI sets one.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Configuration exactly as read from a TOML file.
///
/// ```toml
/// [watch]
/// pattern = "/var/log/app/*.log"
/// poll_interval_ms = 500
/// ```
///
/// All sections are optional; the pattern may instead come from the CLI.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Shell-style glob of the files to watch.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Milliseconds to sleep between ticks. `0` polls as fast as possible.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            pattern: None,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl RawConfigFile {
    /// Apply command-line values on top of whatever the file said.
    pub fn with_overrides(mut self, pattern: Option<String>, poll_interval_ms: Option<u64>) -> Self {
        if let Some(pattern) = pattern {
            self.watch.pattern = Some(pattern);
        }
        if let Some(ms) = poll_interval_ms {
            self.watch.poll_interval_ms = ms;
        }
        self
    }
}

/// Validated configuration, ready to start a watcher from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub pattern: String,
    pub poll_interval: Duration,
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = GlobwatchError;

    fn try_from(raw: RawConfigFile) -> Result<Self> {
        validate_config(&raw)?;

        let pattern = raw.watch.pattern.ok_or_else(|| {
            GlobwatchError::ConfigError("[watch].pattern is missing".to_string())
        })?;

        Ok(Self {
            pattern,
            poll_interval: Duration::from_millis(raw.watch.poll_interval_ms),
        })
    }
}
