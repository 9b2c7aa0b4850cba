//! Tracing setup for the binaries.

use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Events are filtered by the `RUST_LOG` env var, falling back to `default_directives` when it is
/// unset or invalid.
pub fn init(default_directives: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false) // Too verbose, so disable target.
                .with_level(true)
                .compact(),
        )
        .try_init()
}
