//! Logging bootstrap
//!
//! Console output plus an optional daily-rolling `vitrine.log` file. Both
//! layers honor `RUST_LOG` and fall back to the configured level.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

pub const LOG_FILE_NAME: &str = "vitrine.log";

/// Logging configuration for the server process.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory of the rolling log file; `None` disables file logging
    pub log_dir: Option<PathBuf>,
    pub console_output: bool,
    pub level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            console_output: true,
            level: Level::INFO,
        }
    }
}

impl LoggingConfig {
    /// Create from application configuration.
    pub fn from_config(log_dir: Option<String>, console_output: bool, level: String) -> Self {
        Self {
            log_dir: log_dir
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            console_output,
            level: level.parse().unwrap_or(Level::INFO),
        }
    }
}

/// Guard that keeps the file appender worker alive.
///
/// Dropping it flushes buffered log output.
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Initialize the global subscriber.
///
/// The returned [`LoggingGuard`] must be held for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, Box<dyn std::error::Error>> {
    let mut guards: Vec<WorkerGuard> = Vec::new();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if config.console_output {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_line_number(true)
            .with_filter(level_filter(config.level));
        layers.push(Box::new(console_layer));
    }

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;

        let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);

        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .with_filter(level_filter(config.level));
        layers.push(Box::new(file_layer));
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}
