//! Logging setup.
//!
//! Two layers share one registry: a compact console layer filtered by
//! `RUST_LOG` (default `info`), and a plain-text file layer writing
//! `test_run_<YYYYmmdd_HHMMSS>.log` into the logs directory.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INSTALLED: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Name of a run log created now
#[must_use]
pub fn log_file_name() -> String {
    format!("test_run_{}.log", crate::fixture::timestamp())
}

fn filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
}

/// Install the global subscriber and return the run log path, if any.
///
/// Only the first call in a process has an effect; later calls return the
/// path chosen by the first. When the log file cannot be created the run
/// continues with console output only.
pub fn init(log_dir: Option<&Path>) -> Option<PathBuf> {
    INSTALLED
        .get_or_init(|| {
            let file = log_dir.and_then(|dir| {
                let path = dir.join(log_file_name());
                std::fs::create_dir_all(dir)
                    .and_then(|()| File::create(&path))
                    .map(|file| (path.clone(), file))
                    .map_err(|e| eprintln!("cannot create log file {}: {e}", path.display()))
                    .ok()
            });
            let (path, file_layer) = match file {
                Some((path, file)) => (
                    Some(path),
                    Some(
                        tracing_subscriber::fmt::layer()
                            .with_ansi(false)
                            .with_writer(Mutex::new(file))
                            .with_filter(filter()),
                    ),
                ),
                None => (None, None),
            };
            let console = tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact()
                .with_filter(filter());
            if tracing_subscriber::registry()
                .with(console)
                .with(file_layer)
                .try_init()
                .is_err()
            {
                warn!("a global subscriber was already installed; keeping it");
            }
            path
        })
        .clone()
}

/// Path of the current run log, if logging has been initialised with one
#[must_use]
pub fn log_file() -> Option<&'static Path> {
    INSTALLED.get().and_then(Option::as_deref)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name_shape() {
        let name = log_file_name();
        assert!(name.starts_with("test_run_"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "test_run_20250101_120000.log".len());
    }

    #[test]
    fn test_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let first = init(Some(dir.path()));
        let second = init(None);
        assert_eq!(first, second);
        assert_eq!(log_file().map(Path::to_path_buf), first);
    }
}
