//! Logging setup
//!
//! Installs a `tracing` subscriber from [`LoggingConfig`]. `RUST_LOG` takes
//! precedence over the configured level.

use crate::config::LoggingConfig;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the level filter for the given config
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter_from(from_env.as_deref(), config)
}

fn filter_from(directives: Option<&str>, config: &LoggingConfig) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(format!("fintrack={}", config.level)))
}

/// Initialize global logging.
///
/// Logs go to stderr, or to `config.file` when set, so CLI output on stdout
/// stays clean. Returns an error if a log file cannot be opened or a
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = env_filter(config);
    let json = config.format.eq_ignore_ascii_case("json");

    match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let writer = Arc::new(file);
            if json {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_writer(writer))
                    .try_init()?;
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_ansi(false).with_writer(writer))
                    .try_init()?;
            }
        }
        None => {
            if json {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .try_init()?;
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_writer(std::io::stderr))
                    .try_init()?;
            }
        }
    }

    Ok(())
}
