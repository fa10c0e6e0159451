//! Structured logging setup.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Install the global tracing subscriber.
///
/// Development gets pretty human-readable output at DEBUG with file locations;
/// production gets flattened JSON at INFO for log aggregation. `RUST_LOG`
/// overrides either default.
pub fn init_tracing(env: Environment) {
    if env.is_development() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug,tower_http=debug,sqlx=warn"));

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(filter),
            )
            .init();
    } else {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn"));

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true)
                    .with_filter(filter),
            )
            .init();
    }

    tracing::info!(environment = ?env, "tracing initialized");
}
