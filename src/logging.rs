//! Tracing initialization.
//!
//! One compact console subscriber, filtered by `RUST_LOG` with an `info`
//! default. Kept separate from `main.rs` so tests and future front ends can
//! reuse it.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).compact().try_init();
}
