//! Tracing subscriber setup for binaries and notebooks embedding autoop.

use autoop_error::{AutoopResult, ConfigError};
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence when set. Otherwise the level is `debug` when
/// `verbose` is true and `info` when it is not.
///
/// # Errors
///
/// Returns a configuration error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> AutoopResult<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to initialize tracing: {}", e)).into())
}
