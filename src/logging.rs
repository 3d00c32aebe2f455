//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Default filter for `roam serve`.
pub const SERVE_LOG_DIRECTIVE: &str = "roam=info";

/// Default filter for the local dashboard; quieter so the screen stays clean.
pub const LOCAL_LOG_DIRECTIVE: &str = "roam=warn";

/// Build the filter: `RUST_LOG` when set and valid, `default_directive` otherwise.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install the global subscriber writing to stderr.
///
/// Calling this more than once keeps the first subscriber.
pub fn init(default_directive: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
