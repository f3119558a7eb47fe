//! Tracing initialization.
//!
//! Sets up the `tracing` subscriber for the binary: an `EnvFilter` resolved
//! from the environment (falling back to the configured level) feeding a
//! standard fmt layer on stderr. The library itself only emits spans and
//! events; wiring a subscriber is the consumer's decision.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// Filter resolution order:
/// 1. `RUST_LOG`, when set
/// 2. `level`, when provided (from config or `--verbose`)
/// 3. `"urlscope=warn"`
///
/// Idempotent: only the first call installs a subscriber; later calls are
/// silently ignored.
pub fn init_tracing(level: Option<&str>) {
    let fallback = level.unwrap_or("urlscope=warn").to_string();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
