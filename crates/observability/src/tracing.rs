//! Tracing subscriber initialization.
//!
//! Filtering comes from `RUST_LOG` (default `info`). `LOG_FORMAT=compact`
//! switches the JSON output to human-readable lines for local runs.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops). The `service`
/// name is recorded on startup so multi-service log streams stay separable.
pub fn init(service: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let compact = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("compact"))
        .unwrap_or(false);

    let initialized = if compact {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .with_target(false)
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .with_target(false)
            .try_init()
            .is_ok()
    };

    if initialized {
        ::tracing::info!(service, "observability initialized");
    }
}
