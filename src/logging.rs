//! # Logging Bootstrap
//!
//! Console tracing setup for binaries and tests that want to see the
//! registry's diagnostic channel (near-capacity warnings, eviction errors).
//! Library consumers that install their own subscriber should skip this.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging, honoring `RUST_LOG` when set.
///
/// Idempotent, and tolerant of a subscriber installed elsewhere.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_filter(filter),
        );

        // A global subscriber may already be set by the host application
        if subscriber.try_init().is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }
    });
}
