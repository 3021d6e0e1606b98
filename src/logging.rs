//! Tracing setup.
//!
//! The TUI owns the terminal, so logs go to a file instead of stderr.
//! Disabled entirely unless a log path is configured.

use std::fs::OpenOptions;

use tracing_subscriber::EnvFilter;

/// Initialize file logging if `log_path` is set.
///
/// The filter honors `RUST_LOG` and defaults to `info`. Failures to open the
/// log file are reported but never fatal; the app just runs without logs.
pub fn init(log_path: Option<&str>) {
    let Some(path) = log_path else {
        return;
    };

    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("cftrack: could not open log file {path}: {err}");
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .try_init();
}
