//! Tracing subscriber bootstrap for binaries embedding the crate.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` when set and defaults to `info` otherwise.
/// Call once at startup; the store reports asynchronous remote failures
/// through `tracing`, so without a subscriber those reports go nowhere.
///
/// # Panics
/// Panics if a global subscriber is already installed.
pub fn init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().pretty())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
