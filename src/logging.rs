use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{NormalizeError, Result};

const LOG_FILE_PREFIX: &str = "pnad_covid";
const LOG_FILE_SUFFIX: &str = "log";

/// Initializes the logging system.
///
/// Console output goes to stderr so stdout stays free for command output.
/// When `log_dir` is set, a daily-rotated JSON log file is written there as
/// well. The returned guard must be held until exit so buffered lines flush.
pub fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Respect RUST_LOG if set; otherwise default to info for our crate
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pnad_covid=info,warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let (writer, guard) = file_writer(dir)?;
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}

/// Open the daily-rotated log file under `dir`, creating the directory.
pub fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)
        .map_err(|e| {
            NormalizeError::Config(format!("cannot open log directory {}: {e}", dir.display()))
        })?;
    Ok(tracing_appender::non_blocking(appender))
}
