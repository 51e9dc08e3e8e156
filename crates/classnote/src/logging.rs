//! File-based structured logging.
//!
//! Stdout carries the terminal UI, so events go to a daily-rotated file in
//! the platform data directory. Only the most recent week of files is kept.

use crate::{AppError, AppResult, config::LoggingConfig};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, prelude::*};

const LOG_FILE_PREFIX: &str = "classnote.log";
const MAX_LOG_FILES: usize = 7;

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. The returned
/// guard flushes buffered events on drop and must live until exit.
#[track_caller]
pub fn init(config: &LoggingConfig, data_dir: &Path) -> AppResult<WorkerGuard> {
    let log_dir = data_dir.join("logs");
    fs::create_dir_all(&log_dir)?;

    if let Err(e) = cleanup_old_logs(&log_dir) {
        eprintln!("Warning: failed to clean up old logs: {}", e);
    }

    let (non_blocking, guard) =
        tracing_appender::non_blocking(rolling::daily(&log_dir, LOG_FILE_PREFIX));

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| AppError::ConfigError {
            reason: format!("Failed to install log subscriber: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    tracing::debug!(log_dir = %log_dir.display(), "Logging initialized");

    Ok(guard)
}

/// Rotated files look like `classnote.log.YYYY-MM-DD`.
pub(crate) fn is_rotated_log(file_name: &str) -> bool {
    file_name
        .strip_prefix(LOG_FILE_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|date| date.matches('-').count() == 2)
}

fn cleanup_old_logs(log_dir: &Path) -> std::io::Result<()> {
    let mut log_files: Vec<(PathBuf, std::time::SystemTime)> = fs::read_dir(log_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let file_name = path.file_name()?.to_string_lossy().to_string();
            if !is_rotated_log(&file_name) {
                return None;
            }
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((path, modified))
        })
        .collect();

    // Newest first
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    for (path, _) in log_files.iter().skip(MAX_LOG_FILES) {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to delete old log file");
        }
    }

    Ok(())
}
