//! `tracing-subscriber` initialisation

use fmbridge_domain::{FmBridgeError, LoggingConfig, Result};
use tracing_subscriber::EnvFilter;

/// Noisy dependency targets capped below the configured level.
const QUIET_TARGETS: &[(&str, &str)] =
    &[("hyper", "warn"), ("hyper_util", "warn"), ("rustls", "warn")];

/// Filter from `RUST_LOG`, or the configured level when it is unset.
///
/// # Errors
/// Returns `FmBridgeError::Config` if the configured level is not a valid
/// filter directive.
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut directives = vec![config.level.clone()];
    for (target, level) in QUIET_TARGETS {
        directives.push(format!("{target}={level}"));
    }

    let filter = directives.join(",");
    EnvFilter::try_new(&filter)
        .map_err(|e| FmBridgeError::Config(format!("Invalid log filter '{filter}': {e}")))
}

/// Install the global subscriber.
///
/// # Errors
/// Returns `FmBridgeError::Config` for an invalid filter, or
/// `FmBridgeError::Internal` when a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_env_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.compact().try_init()
    };

    installed.map_err(|e| FmBridgeError::Internal(format!("Could not install subscriber: {e}")))
}
