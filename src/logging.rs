//! Log file output for applications embedding the client.
//!
//! The client only emits `tracing` spans and events (one span per API
//! operation, a debug event per request). Nothing is written until a
//! subscriber is installed, and the library never installs one on its own.
//! Callers that don't have a subscriber can route the client's output to a
//! daily rotating file with [`init_with`] or [`init`].

use std::path::{Path, PathBuf};

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Filter used by [`init`] when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "youtrack_sdk=info,warn";

/// Prefix of the rotated log files (`youtrack-sdk.log.<date>`).
const LOG_FILE_PREFIX: &str = "youtrack-sdk.log";

/// Build a subscriber writing to a daily rotating file in `log_dir`.
///
/// Writes go through a background worker; the returned guard flushes it on
/// drop, so it must outlive the subscriber's use.
///
/// # Errors
///
/// Fails if `filter` is not a valid `EnvFilter` directive, or if the log
/// directory cannot be created.
pub fn file_subscriber(
    log_dir: &Path,
    filter: &str,
) -> anyhow::Result<(impl Subscriber + Send + Sync + 'static, WorkerGuard)> {
    let filter = EnvFilter::try_new(filter)?;

    std::fs::create_dir_all(log_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(log_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    Ok((subscriber, guard))
}

/// Install a file subscriber for `log_dir` as the global default.
///
/// # Errors
///
/// Fails as [`file_subscriber`] does, or if a global subscriber is already set.
pub fn init_with(log_dir: &Path, filter: &str) -> anyhow::Result<WorkerGuard> {
    let (subscriber, guard) = file_subscriber(log_dir, filter)?;
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(log_dir = %log_dir.display(), "File logging enabled");
    Ok(guard)
}

/// [`init_with`] using [`log_directory`] and `RUST_LOG`, falling back to
/// [`DEFAULT_LOG_FILTER`].
pub fn init() -> anyhow::Result<WorkerGuard> {
    let log_dir = log_directory()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

    init_with(&log_dir, &filter)
}

/// The platform local data directory with `youtrack-sdk/logs` appended.
pub fn log_directory() -> Option<PathBuf> {
    dirs::data_local_dir().map(|base| base.join("youtrack-sdk").join("logs"))
}
