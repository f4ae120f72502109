//! Tracing setup.
//!
//! The terminal is owned by the TUI, so everything goes to a log file that is
//! truncated at start-up. `RUST_LOG` overrides the default `info` level.

use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

pub const LOG_FILE_NAME: &str = "movie_finder.log";

/// Installs the global subscriber and returns the path of the log file.
///
/// # Errors
///
/// Fails if the log directory or file cannot be created, or if a global
/// subscriber is already installed.
pub fn init_tracing(logs_dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    create_dir_all(logs_dir)?;

    let log_file_path = logs_dir.join(LOG_FILE_NAME);
    // Truncated only once the subscriber is installed, so a failed second
    // call leaves the live log alone
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&log_file_path)?;
    let truncate_handle = log_file.try_clone()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).try_init()?;
    truncate_handle.set_len(0)?;

    Ok(log_file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let logs_dir = dir.path().join("nested").join("logs");

        let path = init_tracing(&logs_dir).unwrap();
        tracing::info!("hello from the test");

        assert_eq!(path, logs_dir.join(LOG_FILE_NAME));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("hello from the test"));

        assert!(init_tracing(&logs_dir).is_err());
        let after_second_init = std::fs::read_to_string(&path).unwrap();
        assert!(after_second_init.contains("hello from the test"));
    }
}
