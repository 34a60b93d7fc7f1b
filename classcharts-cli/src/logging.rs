//! Logging setup

use std::env;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` wins over `LOG_LEVEL`.
pub fn init_logging() {
    let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    let filter = filter_for(env::var("RUST_LOG").ok(), &level);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn filter_for(rust_log: Option<String>, level: &str) -> EnvFilter {
    match rust_log {
        Some(rust_log) => EnvFilter::new(rust_log),
        None => EnvFilter::new(level.to_lowercase()),
    }
}
