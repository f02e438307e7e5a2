//! File logging setup

use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::Context;

/// Send `tracing` output to `path`, appending.
///
/// `RUST_LOG` is honoured on top of a WARN default. Calling this again after
/// a subscriber is installed leaves the first one in place.
pub fn init_file_logging(path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .try_init();

    if installed.is_err() {
        tracing::debug!(path = %path.display(), "Subscriber already installed");
    }
    Ok(())
}
