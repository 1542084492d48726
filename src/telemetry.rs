//! Tracing subscriber setup for the CLI.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::AdlensError;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// Logs go to stderr so that stdout carries only reports. Verbosity follows
/// `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
///
/// # Errors
/// Returns [`AdlensError::Config`] if a subscriber is already installed.
pub fn init_tracing() -> Result<(), AdlensError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| AdlensError::Config(format!("failed to create log filter: {e}")))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| AdlensError::Config(format!("failed to initialize tracing: {e}")))
}
