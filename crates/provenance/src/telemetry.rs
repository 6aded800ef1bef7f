//! Console logging setup and one-call initialization.

use provenance_error::DiagnosticsConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a console `tracing` subscriber filtered by `RUST_LOG`.
///
/// Falls back to `warn,provenance=info` when `RUST_LOG` is unset. Error set
/// additions are logged at the `error` level, so they are visible under the
/// fallback filter once verbosity reaches
/// [`LOG_THRESHOLD`](provenance_error::LOG_THRESHOLD).
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,provenance=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}

/// Set up logging, then load, validate and apply the layered
/// [`DiagnosticsConfig`].
///
/// Returns the configuration now in effect.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed or the
/// configuration cannot be loaded or is invalid.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let config = provenance::init()?;
/// println!("keeping {} frames per stack", config.max_stack_depth());
/// # Ok(())
/// # }
/// ```
pub fn init() -> Result<DiagnosticsConfig, Box<dyn std::error::Error + Send + Sync>> {
    init_tracing()?;

    let config = DiagnosticsConfig::load()?;
    config.validate()?;
    config.apply();

    info!(
        max_stack_depth = config.max_stack_depth(),
        verbosity = config.verbosity(),
        "Diagnostics initialized"
    );

    Ok(config)
}
