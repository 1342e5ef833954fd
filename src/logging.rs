use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

use crate::cli::Verbosity;

static INIT: OnceLock<()> = OnceLock::new();

/// Initialize the `tracing` subscriber for the selected verbosity.
///
/// Explicit `--verbose`/`--quiet` flags win over `RUST_LOG`; without them the
/// environment filter is used, falling back to `info`.
pub fn init(verbosity: Verbosity) {
    INIT.get_or_init(|| {
        let filter = match verbosity.directive() {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };
        let shown = filter.to_string();
        let subscriber = Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr));
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            // Ignore error if a subscriber is already set (e.g., tests).
        }
        tracing::debug!("log level set to {shown}");
    });
}
