//! Tracing bootstrap shared by binaries and tests.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `debug` toggles between `debug` and
/// `info` as the default level. Safe to call more than once - later calls
/// are no-ops, so every test can invoke it without coordination.
pub fn init(debug: bool) {
    INIT.call_once(|| {
        let default_level = if debug { "debug" } else { "info" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    });
}
