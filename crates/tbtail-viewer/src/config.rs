//! Viewer configuration
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! rescan_interval_secs = 5
//! smoothing_levels = [0, 25, 100]
//!
//! [log.file]
//! directory = "/tmp/tbtail-logs"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tbtail_core::analytics::DEFAULT_PROGRESS_TAG;
use tbtail_logging::{FileConfig, LogConfig};
use thiserror::Error;

use crate::cli::Cli;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Input poll timeout; also the redraw cadence
    pub poll_interval_ms: u64,
    /// How often file sizes are checked for new data
    pub rescan_interval_secs: u64,
    /// Window sizes cycled by the smoothing key
    pub smoothing_levels: Vec<usize>,
    /// Fractional-progress tag driving the ETA estimate
    pub progress_tag: String,
    pub log: LogConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            rescan_interval_secs: 15,
            smoothing_levels: vec![0, 10, 50, 100, 200],
            progress_tag: DEFAULT_PROGRESS_TAG.to_string(),
            log: LogConfig::interactive(None),
        }
    }
}

impl ViewerConfig {
    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smoothing_levels.is_empty() {
            return Err(ConfigError::Invalid(
                "smoothing_levels must contain at least one level".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be non-zero".to_string()));
        }
        if self.progress_tag.is_empty() {
            return Err(ConfigError::Invalid("progress_tag must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn rescan_interval(&self) -> Duration {
        Duration::from_secs(self.rescan_interval_secs)
    }

    /// Command-line flags win over file values
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(secs) = cli.rescan_secs {
            self.rescan_interval_secs = secs;
        }
        if let Some(level) = &cli.log_level {
            self.log.default_level = level.clone();
        }
        if let Some(directory) = &cli.log_dir {
            let file = self.log.file.take().unwrap_or_default();
            self.log.file = Some(FileConfig {
                directory: directory.clone(),
                ..file
            });
        }
    }

    /// Logging while the TUI owns the terminal
    pub fn interactive_log(&self) -> LogConfig {
        let mut log = self.log.clone();
        log.console.enabled = false;
        log.capture.enabled = true;
        log
    }

    /// Logging for one-shot commands such as export
    pub fn batch_log(&self) -> LogConfig {
        let mut log = self.log.clone();
        log.console.enabled = true;
        log.capture.enabled = false;
        log
    }
}
