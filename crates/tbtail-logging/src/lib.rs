//! Tracing subscriber setup for tbtail
//!
//! # Features
//!
//! - **Console Output**: pretty or JSON lines, for non-interactive commands
//! - **File Output**: JSON lines with daily/hourly rotation via tracing-appender
//! - **Capture**: a bounded in-memory buffer the viewer shows in its log panel
//!
//! `RUST_LOG` overrides the configured default level.
//!
//! # Quick Start
//!
//! ```ignore
//! use tbtail_logging::{LogBuffer, LogConfig, SubscriberBuilder};
//!
//! let buffer = LogBuffer::new(200);
//! let _guard = SubscriberBuilder::new()
//!     .with_config(LogConfig::interactive(None))
//!     .with_capture(buffer.clone())
//!     .init()?;
//!
//! tracing::info!("shows up in the viewer's log panel");
//! ```

pub mod capture;
pub mod config;

pub use capture::{CaptureLayer, LogBuffer, LogLine};
pub use config::{CaptureConfig, ConsoleConfig, FileConfig, LogConfig, RotationStrategy};
pub use tracing_appender::non_blocking::WorkerGuard;

use std::fs::{self, File};
use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Log directory or file could not be created
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rolling appender could not be built
    #[error("Log appender error: {0}")]
    Appender(#[from] InitError),

    /// A global subscriber is already installed
    #[error("Subscriber already initialized: {0}")]
    AlreadyInitialized(#[from] TryInitError),

    /// Capture level is not a tracing level
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
}

/// Open the writer for file output
///
/// `Never` truncates a single `<prefix>.log`; the rotating strategies append
/// to `<prefix>.<date>.jsonl` files.
fn file_writer(config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(&config.directory)?;

    let rotation = match config.rotation {
        RotationStrategy::Never => {
            let file = File::create(config.directory.join(format!("{}.log", config.prefix)))?;
            return Ok(tracing_appender::non_blocking(file));
        }
        RotationStrategy::Daily => Rotation::DAILY,
        RotationStrategy::Hourly => Rotation::HOURLY,
    };

    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(&config.prefix)
        .filename_suffix("jsonl")
        .build(&config.directory)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Builder for configuring and installing the global subscriber
pub struct SubscriberBuilder {
    config: LogConfig,
    capture: Option<LogBuffer>,
}

impl SubscriberBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
            capture: None,
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Mirror events into `buffer`
    pub fn with_capture(mut self, buffer: LogBuffer) -> Self {
        self.config.capture.enabled = true;
        self.capture = Some(buffer);
        self
    }

    /// Install the subscriber globally
    ///
    /// The returned guard flushes file output on drop and must be held for
    /// the life of the program.
    pub fn init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.default_level));

        let capture = if self.config.capture.enabled {
            let level = Level::from_str(&self.config.capture.level)
                .map_err(|_| LoggingError::InvalidLevel(self.config.capture.level.clone()))?;
            let buffer = self
                .capture
                .unwrap_or_else(|| LogBuffer::new(self.config.capture.capacity));
            Some(CaptureLayer::new(buffer, level))
        } else {
            None
        };

        let console = &self.config.console;
        let pretty_console = (console.enabled && console.pretty).then(|| {
            tracing_subscriber::fmt::layer()
                .with_ansi(console.ansi)
                .with_target(true)
        });
        let json_console = (console.enabled && !console.pretty).then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .flatten_event(true)
        });

        let (file_layer, guard) = match &self.config.file {
            Some(file_config) => {
                let (writer, guard) = file_writer(file_config)?;
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .flatten_event(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(writer);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        Registry::default()
            .with(env_filter)
            .with(capture)
            .with(pretty_console)
            .with(json_console)
            .with(file_layer)
            .try_init()?;

        Ok(guard)
    }
}

impl Default for SubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}
