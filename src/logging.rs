//! Tracing setup.
//!
//! The TUI owns the terminal, so log output only goes to a file. Without a
//! log file no subscriber is installed and events are dropped.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "storefront=info";

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Build a subscriber that appends plain-text events to `path`.
pub fn file_subscriber(
    path: &Path,
    filter: EnvFilter,
) -> Result<impl tracing::Subscriber + Send + Sync> {
    let file = open_log_file(path)?;
    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish())
}

/// Install the global subscriber when a log file was requested.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    file_subscriber(path, filter)?
        .try_init()
        .context("Failed to install log subscriber")?;
    tracing::info!(path = %path.display(), "Logging to file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("storefront-log-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn events_are_appended_without_ansi() {
        let path = temp_log("append.log");
        let _ = std::fs::remove_file(&path);

        for message in ["first fetch", "second fetch"] {
            let subscriber = file_subscriber(&path, EnvFilter::new("info")).unwrap();
            tracing::subscriber::with_default(subscriber, || {
                tracing::warn!(page = 3, "{}", message);
            });
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("first fetch"));
        assert!(contents.contains("second fetch"));
        assert!(contents.contains("page=3"));
        assert!(!contents.contains('\u{1b}'));
    }

    #[test]
    fn filter_drops_lower_levels() {
        let path = temp_log("filtered.log");
        let _ = std::fs::remove_file(&path);

        let subscriber = file_subscriber(&path, EnvFilter::new("warn")).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("hidden detail");
            tracing::error!("visible failure");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("hidden detail"));
        assert!(contents.contains("visible failure"));
    }

    #[test]
    fn no_log_file_installs_nothing() {
        assert!(init(None).is_ok());
    }
}
