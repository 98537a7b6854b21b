use anyhow::{Context, Result};
use std::{
    fs,
    path::Path,
    time::{Duration, SystemTime},
};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log files older than this are removed on startup and after each scheduled run
pub const MAX_LOG_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 3);

/// Keeps the file writer flushing until dropped
#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

pub fn init_logging(log_dir: impl AsRef<Path>, prefix: &str, level: &str) -> Result<LoggerGuard> {
    let log_dir = log_dir.as_ref();

    let (level, level_valid) = match level {
        "trace" | "debug" | "info" | "warn" | "error" => (level, true),
        _ => ("info", false),
    };

    let builder = EnvFilter::builder().with_default_directive(
        level
            .parse()
            .context("Failed to parse log level directive")?,
    );

    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .context("Failed to create file appender")?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .init();

    if !level_valid {
        tracing::warn!("Invalid log level, defaulting to 'info'");
    }

    if let Err(e) = cleanup_old_logs(log_dir, prefix, MAX_LOG_AGE) {
        tracing::warn!("Failed to delete old log file: {}", e);
    }

    Ok(LoggerGuard(guard))
}

/// Record an error that stopped the process before it finished starting up
pub fn log_startup_error(err: &anyhow::Error) {
    tracing::error!("Startup failed: {:#}", err);
}

/// Remove `<prefix>*.log` files in `log_dir` last modified more than `max_age` ago.
/// Returns how many were deleted.
pub fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut deleted = 0;

    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            if file_name.starts_with(prefix) && file_name.ends_with(".log") {
                let metadata = fs::metadata(&path)?;
                if let Ok(modified) = metadata.modified() {
                    if now.duration_since(modified).unwrap_or_default() > max_age {
                        fs::remove_file(&path)?;
                        deleted += 1;
                        tracing::info!("Old log file deleted: {}", file_name);
                    }
                }
            }
        }
    }
    Ok(deleted)
}
