//! Process-wide logging setup.
//!
//! The library itself only emits `tracing` events. A binary calls
//! [`init_logging`] once at start-up; the installed subscriber lives until the
//! process exits.

use crate::error::{Result, TelemetryError};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` overrides `default_filter`. Fails if a global subscriber is
/// already installed.
pub fn init_logging(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| TelemetryError::Configuration(format!("Invalid log filter: {}", e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .compact()
        .try_init()
        .map_err(|e| TelemetryError::Configuration(format!("Failed to set logger: {}", e)))
}
