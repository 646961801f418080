use std::env;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    PrefsError, Result,
    config::{ConfigPaths, GeneralConfig, LogFormat},
};

const LOG_FORMAT_VAR: &str = "PREFSYNC_LOG_FORMAT";

/// Initialize tracing for the application
///
/// Uses the RUST_LOG environment variable if set, otherwise the configured
/// log level. The console format comes from `PREFSYNC_LOG_FORMAT` when set,
/// otherwise from the configuration. Logs go to stderr so command output on
/// stdout stays machine-readable.
///
/// # Errors
/// Returns error if tracing subscriber initialization fails
pub fn init(general: &GeneralConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(general));

    match log_format(general) {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
    .map_err(|e| PrefsError::Logging(e.to_string()))
}

/// Initialize tracing with file output
///
/// Similar to [`init`] but also writes logs to a daily rotated file
/// in the prefsync log directory. The returned guard flushes the file writer
/// when dropped and must be kept alive for the lifetime of the process.
///
/// # Errors
/// Returns error if file creation or tracing subscriber initialization fails
pub fn init_with_file(general: &GeneralConfig) -> Result<WorkerGuard> {
    const DAYS_TO_KEEP: usize = 7;

    let log_dir = ConfigPaths::log_dir()?;

    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .max_log_files(DAYS_TO_KEEP)
        .filename_prefix("prefsync")
        .filename_suffix("log")
        .build(&log_dir)
        .map_err(|e| PrefsError::Logging(e.to_string()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let registry = tracing_subscriber::registry().with(env_filter(general));

    match log_format(general) {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .try_init(),
    }
    .map_err(|e| PrefsError::Logging(e.to_string()))?;

    Ok(guard)
}

fn env_filter(general: &GeneralConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(general.log_level.to_string()))
}

fn log_format(general: &GeneralConfig) -> LogFormat {
    env::var(LOG_FORMAT_VAR)
        .ok()
        .and_then(|name| LogFormat::parse(&name))
        .unwrap_or(general.log_format)
}
