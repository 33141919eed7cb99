//! Tracing subscriber setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter applied when `RUST_LOG` is unset: `level` for the vitrine crates.
pub fn default_filter(level: &str) -> String {
    format!("vitrine={level},vitrine_cli={level},vitrine_core={level},vitrine_effects={level}")
}

/// Install the global subscriber, logging to stderr.
///
/// Precedence: `RUST_LOG` > `level`. A second call is a no-op.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
