//! File-backed `tracing` subscriber.
//!
//! The terminal belongs to the UI, so events go to `logging.file` (or the XDG
//! state dir). `CADENZA_LOG` overrides `logging.level` with full `EnvFilter`
//! syntax.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Settings;

pub const LOG_ENV: &str = "CADENZA_LOG";

/// Build the filter from `CADENZA_LOG`, falling back to `level`.
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Logging is skipped (not fatal) when the log
/// file cannot be opened.
pub fn init(settings: &Settings) {
    let Some(path) = settings.log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("cadenza: cannot open log file {}: {e}", path.display());
            return;
        }
    };

    let installed = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter(&settings.logging.level))
        .try_init();

    if installed.is_ok() {
        tracing::info!(log = %path.display(), "cadenza starting");
    }
}
