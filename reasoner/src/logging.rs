//! Diagnostic tracing for the reasoner.
//!
//! Tracing goes to stderr and is controlled by `RUST_LOG`. It never mixes
//! with command output on stdout, so `reasoner solve --json` stays parseable
//! at any log level.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// Reads `RUST_LOG`; defaults to `warn` when unset.
///
/// # Example
/// ```bash
/// RUST_LOG=reasoner=debug reasoner solve "What is 25 * 4 + 10?"
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // try_init: embedders (eval, ui) may already have installed a subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
