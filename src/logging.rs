//! # Logging setup.
//!
//! Installs a `tracing-subscriber` fmt layer filtered by `RUST_LOG`, falling
//! back to the configured directive. Safe to call more than once.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initializes console logging. `default_filter` applies when `RUST_LOG` is unset or invalid.
pub fn init_tracing(default_filter: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        // Another global subscriber may already be installed (tests, embedding).
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_level(true),
            )
            .try_init();
    });
}
