//! Epoch tracking configuration via `epoch.toml`
//!
//! The transaction manager reads this once at startup and builds one tracker
//! per worker from it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use strata_epoch_core::{EpochError, EpochResult};

/// Config file name placed in the database data directory.
pub const CONFIG_FILE_NAME: &str = "epoch.toml";

/// Epoch tracking configuration loaded from `epoch.toml`.
///
/// # Example
///
/// ```toml
/// # Queue finished transactions for the garbage collector (default: false)
/// gc_enabled = true
///
/// # Number of worker threads, one tracker each (default: 1)
/// workers = 8
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochConfig {
    /// Queue committed and aborted transactions for the garbage collector.
    #[serde(default)]
    pub gc_enabled: bool,
    /// Number of worker threads. Must be at least 1.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Capacity reserved for each tracker's completed queue, and for the
    /// fresh queue swapped in by every drain.
    #[serde(default)]
    pub completed_capacity: usize,
}

fn default_workers() -> usize {
    1
}

impl Default for EpochConfig {
    fn default() -> Self {
        Self {
            gc_enabled: false,
            workers: default_workers(),
            completed_capacity: 0,
        }
    }
}

impl EpochConfig {
    /// Check field values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `workers` is zero or does not fit a `WorkerId`.
    pub fn validate(&self) -> EpochResult<()> {
        if self.workers == 0 {
            return Err(EpochError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if u32::try_from(self.workers).is_err() {
            return Err(EpochError::InvalidConfig(format!(
                "workers = {} exceeds the maximum worker id",
                self.workers
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Strata epoch tracking configuration
#
# Queue committed and aborted transactions for the garbage collector.
# When false, finished transactions are only removed from the active set.
gc_enabled = false

# Number of worker threads. Each worker owns one epoch tracker.
workers = 1

# Capacity reserved for each worker's completed-transaction queue (default: 0).
# Raise it to avoid reallocation when many transactions finish between drains.
# completed_capacity = 1024
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> EpochResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EpochConfig = toml::from_str(&content).map_err(|e| {
            EpochError::InvalidConfig(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> EpochResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> EpochResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            EpochError::InvalidConfig(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
