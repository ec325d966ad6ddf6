//! Tracing subscriber setup.
//!
//! Events go to stderr so command output on stdout stays clean. `RUST_LOG`
//! overrides the filter passed in.

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber.
///
/// Safe to call multiple times; only the first call has effect. An
/// unparsable `default_filter` falls back to `info`.
pub fn init(default_filter: &str) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init();
    });
}
