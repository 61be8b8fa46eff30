//! Tracing setup.
//!
//! The TUI owns the terminal, so logs go to `$TASKLIST_HOME/logs/tasklist.log`
//! through a non-blocking appender. Keep the returned guard alive for the
//! lifetime of the process or buffered lines are lost.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "TASKLIST_LOG";

/// Log file name inside the logs directory.
pub const LOG_FILE: &str = "tasklist.log";

/// Builds the filter: `TASKLIST_LOG` wins, then `default_level`.
///
/// # Errors
/// Returns an error if neither directive parses.
pub fn build_filter(default_level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid {LOG_ENV} / log level {default_level:?}: {e}"))
}

/// Installs the global subscriber writing to `dir/tasklist.log`.
///
/// A subscriber that is already installed is left in place.
///
/// # Errors
/// Returns an error if the log directory cannot be created or the filter is invalid.
pub fn init_file_logging(dir: &Path, default_level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let filter = build_filter(default_level)?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false)
        .try_init();

    if let Err(err) = init_result {
        tracing::debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_level() {
        assert!(build_filter("debug").is_ok());
    }

    #[test]
    fn test_init_creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");

        let _guard = init_file_logging(&logs, "info").unwrap();

        assert!(logs.is_dir());
    }
}
