//! Logging Infrastructure
//!
//! Structured logging setup for development and production environments.

use std::path::Path;

/// Initialize the logger (console only)
pub fn init_logger() -> anyhow::Result<()> {
    init_logger_with_file(None, None)
}

/// Initialize the logger with optional file output
///
/// Reads `RUST_LOG` when set, otherwise falls back to the provided level.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) -> anyhow::Result<()> {
    let level = log_level.unwrap_or("info");
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // Add file output if log_dir is provided
    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "shop-server");
            subscriber
                .with_writer(file_appender)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {e}"))?;
            return Ok(());
        }
    }

    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {e}"))?;
    Ok(())
}
