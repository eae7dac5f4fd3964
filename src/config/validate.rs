// src/config/validate.rs

use tracing::warn;

use crate::config::model::RawConfigFile;
use crate::errors::{GlobwatchError, Result};
use crate::watch::GlobPattern;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - a `[watch].pattern` is present
/// - the pattern is not blank
///
/// A pattern that fails to compile is only warned about: the watcher treats
/// it as a recoverable condition and keeps retrying.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    let pattern = match cfg.watch.pattern.as_deref() {
        Some(p) => p,
        None => {
            return Err(GlobwatchError::ConfigError(
                "no pattern given: set [watch].pattern or pass PATTERN".to_string(),
            ));
        }
    };

    if pattern.trim().is_empty() {
        return Err(GlobwatchError::ConfigError(
            "[watch].pattern must not be empty".to_string(),
        ));
    }

    if let Err(err) = GlobPattern::compile(pattern) {
        warn!(error = %err, "pattern does not compile; the watcher will keep retrying and emit nothing");
    }

    Ok(())
}
