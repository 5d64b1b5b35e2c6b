//! Structured logging configuration.
//!
//! Initializes a `tracing_subscriber` fmt layer from [`LoggingConfig`].
//! `RUST_LOG` takes precedence over the configured level when set, so a
//! deployment can raise verbosity without touching its config file.

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{ProtocolError, Result};

/// Install the global subscriber. Call once at startup; a second call fails
/// because the global default can only be set once per process.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| ProtocolError::Config(format!("Failed to install subscriber: {e}")))?;

    info!(app = %config.app_name, "Logging initialized");
    Ok(())
}
