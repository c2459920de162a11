//! Process-wide `tracing` subscriber.
//!
//! Installed once from [`crate::app::run`]; library code only emits events.
//! Output goes to stderr so `preview` and `query` results on stdout stay
//! pipeable.

use tracing::Level;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Calling this twice is harmless;
/// the second call is ignored.
pub fn init(level: Level, json_output: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("orders_etl={},warn", level.as_str().to_ascii_lowercase())));

    // `try_init` fails only when a global subscriber is already installed.
    if json_output {
        let fmt_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr);
        Registry::default().with(env_filter).with(fmt_layer).try_init().ok();
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr);
        Registry::default().with(env_filter).with(fmt_layer).try_init().ok();
    }
}
