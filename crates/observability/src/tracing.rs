//! Subscriber construction.
//!
//! Filtering is driven by `RUST_LOG`; without it we log `info` for our own
//! crates and `warn` for everything else.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "warn,brandkit_api=info,brandkit_infra=info,tower_http=info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// JSON logs + timestamps, one object per line.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_current_span(true)
        .with_target(true)
        .try_init();
}

pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_test_writer()
        .compact()
        .try_init();
}
