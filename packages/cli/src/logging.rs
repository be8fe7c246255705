//! Log setup for `xp-score`.
//!
//! Reports are the only thing written to stdout; every log line goes to
//! stderr and, when enabled, to a daily rolling file.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "xp-score.log";
const DEFAULT_LOG_DIR: &str = "./logs";

/// Keeps the file writer flushing until dropped at the end of `main`
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

fn parse_enabled(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

pub fn file_logging_enabled() -> bool {
    std::env::var("ENABLE_FILE_LOGS")
        .map(|v| parse_enabled(&v))
        .unwrap_or(false)
}

/// Directory for the rolling log file, `LOG_DIR` or `./logs`
pub fn log_dir() -> String {
    std::env::var("LOG_DIR")
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())
}

/// Install the global subscriber.
///
/// The stderr layer keeps stdout free for the JSON or text report, so
/// `xp-score a.json > report.json` captures the report alone. An invalid
/// `log_level` falls back to `info`.
pub fn init_tracing(log_level: &str) -> Option<FileLogGuard> {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    if file_logging_enabled() {
        let log_dir = log_dir();
        match std::fs::create_dir_all(&log_dir) {
            Ok(()) => {
                let file_appender =
                    RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
                let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
                let file_layer = fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_target(true);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(stderr_layer)
                    .with(file_layer)
                    .init();

                return Some(FileLogGuard { _guard: guard });
            }
            Err(err) => eprintln!("xp-score: cannot create log directory {log_dir}: {err}"),
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();

    None
}
