//! Logging initialization for the detection engine.
//!
//! 検知エンジンのログ初期化

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Log file name used by the rolling appender
const LOG_FILE_NAME: &str = "healthwatch.log";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Directory for log files
    pub log_dir: PathBuf,
    /// File rotation policy
    pub rotation: LogRotation,
    /// Console output enabled
    pub console_enabled: bool,
    /// File output enabled
    pub file_enabled: bool,
}

/// File rotation policy
#[derive(Debug, Clone)]
pub enum LogRotation {
    /// Rotate daily
    Daily,
    /// Rotate hourly
    Hourly,
    /// Never rotate
    Never,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            rotation: LogRotation::Daily,
            console_enabled: true,
            file_enabled: false,
        }
    }
}

impl LogConfig {
    /// Sets the log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Sets the log directory
    pub fn with_log_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// Sets the rotation policy
    pub fn with_rotation(mut self, rotation: LogRotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Enables or disables console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.console_enabled = enabled;
        self
    }

    /// Enables or disables file output
    pub fn with_file(mut self, enabled: bool) -> Self {
        self.file_enabled = enabled;
        self
    }
}

/// Ensures the log directory exists
fn ensure_log_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn file_appender(config: &LogConfig) -> rolling::RollingFileAppender {
    match config.rotation {
        LogRotation::Daily => rolling::daily(&config.log_dir, LOG_FILE_NAME),
        LogRotation::Hourly => rolling::hourly(&config.log_dir, LOG_FILE_NAME),
        LogRotation::Never => rolling::never(&config.log_dir, LOG_FILE_NAME),
    }
}

/// Initializes the logging system.
///
/// Returns the appender guard when file output is enabled; the caller must
/// keep it alive for buffered log lines to be flushed.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let guard = match (config.console_enabled, config.file_enabled) {
        (true, true) => {
            ensure_log_dir(&config.log_dir)?;
            let (writer, guard) = non_blocking(file_appender(config));
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr.and(writer))
                .with_target(true)
                .init();
            Some(guard)
        }
        (true, false) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(true)
                .init();
            None
        }
        (false, true) => {
            ensure_log_dir(&config.log_dir)?;
            let (writer, guard) = non_blocking(file_appender(config));
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .init();
            Some(guard)
        }
        (false, false) => {
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::WARN)
                .init();
            None
        }
    };

    tracing::info!(
        level = %config.level,
        console = config.console_enabled,
        file = config.file_enabled,
        "logging initialized"
    );

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_enabled);
        assert!(!config.file_enabled);
    }

    #[test]
    fn test_log_config_builders() {
        let config = LogConfig::default()
            .with_level("debug")
            .with_log_dir("/tmp/hw-logs")
            .with_console(false)
            .with_file(true);

        assert_eq!(config.level, "debug");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/hw-logs"));
        assert!(!config.console_enabled);
        assert!(config.file_enabled);
    }

    #[test]
    fn test_ensure_log_dir_creates_missing_directory() {
        let temp_dir = tempdir().unwrap();
        let log_dir = temp_dir.path().join("nested").join("logs");

        assert!(ensure_log_dir(&log_dir).is_ok());
        assert!(log_dir.exists());
    }
}
