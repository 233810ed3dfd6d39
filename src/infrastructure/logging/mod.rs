//! Logging initialization using tracing.

use anyhow::{anyhow, Result};
use std::io;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::models::LoggingConfig;

/// Handle keeping the background log writer alive.
///
/// Hold on to this for the lifetime of the process; dropping it flushes
/// and stops the file writer.
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

/// Initialize the global tracing subscriber from configuration.
///
/// Stdout output honors the configured format; file output (when
/// `log_dir` is set) is always JSON with daily rotation.
pub fn init_logging(config: &LoggingConfig) -> Result<LogGuard> {
    let default_level = parse_log_level(&config.level)?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let guard = if let Some(ref log_dir) = config.log_dir {
        let file_appender = rolling::daily(log_dir, "laurel.log");
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking_file)
            .with_ansi(false)
            .with_target(true);

        match config.format.to_lowercase().as_str() {
            "json" => {
                let stdout_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stdout)
                    .with_target(true);
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(file_layer)
                    .with(stdout_layer)
                    .try_init()
                    .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
            }
            _ => {
                let stdout_layer = tracing_subscriber::fmt::layer()
                    .with_writer(io::stdout)
                    .with_target(true);
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(file_layer)
                    .with(stdout_layer)
                    .try_init()
                    .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
            }
        }
        Some(guard)
    } else {
        match config.format.to_lowercase().as_str() {
            "json" => {
                let stdout_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stdout)
                    .with_target(true)
                    .with_filter(env_filter);
                tracing_subscriber::registry()
                    .with(stdout_layer)
                    .try_init()
                    .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
            }
            _ => {
                let stdout_layer = tracing_subscriber::fmt::layer()
                    .with_writer(io::stdout)
                    .with_target(true)
                    .with_filter(env_filter);
                tracing_subscriber::registry()
                    .with(stdout_layer)
                    .try_init()
                    .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
            }
        }
        None
    };

    Ok(LogGuard { _guard: guard })
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(anyhow!("Invalid log level: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
        assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
        assert!(parse_log_level("loud").is_err());
    }
}
