use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use tracing::Level;
use tracing::event;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_FILTER_ENV: &str = "CREWING_LOG";
pub const LOG_DIR_ENV: &str = "CREWING_LOG_DIR";
const LOG_FILE_NAME: &str = "crewing.log";

/// Human readable lines on stderr, or JSON lines in `CREWING_LOG_DIR` when it
/// is set. The guard has to live until the end of `main` so buffered lines
/// are flushed.
pub fn setup_logging() -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.as_str()));

    let guard = match dotenvy::var(LOG_DIR_ENV).ok().map(PathBuf::from) {
        Some(log_dir) => {
            std::fs::create_dir_all(&log_dir)
                .with_context(|| format!("Could not create log directory {}", log_dir.display()))?;
            let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = fmt::layer()
                .with_writer(non_blocking)
                .json()
                .with_file(true)
                .with_line_number(true)
                .with_current_span(true)
                .with_filter(env_filter);

            tracing_subscriber::registry()
                .with(file_layer)
                .try_init()
                .context("Could not install the log subscriber")?;
            Some(guard)
        }
        None => {
            let stderr_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(env_filter);

            tracing_subscriber::registry()
                .with(stderr_layer)
                .try_init()
                .context("Could not install the log subscriber")?;
            None
        }
    };

    event!(Level::DEBUG, "starting logging");
    Ok(guard)
}
