//! Tracing setup for hosts embedding the bridge.

use std::sync::OnceLock;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter
pub const LOG_ENV: &str = "EVOLVE_LOG";

static INIT: OnceLock<()> = OnceLock::new();

/// Install a global subscriber once. `EVOLVE_LOG` wins over `default_filter`.
///
/// Later calls, or a subscriber already installed by the embedder, are left alone.
pub fn init(default_filter: &str) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let installed = SubscriberBuilder::default()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!(filter = default_filter, "tracing initialised");
        }
    });
}
