//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the default level.
///
/// # Errors
/// Fails when a global subscriber is already installed.
pub fn init(json: bool, verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder
            .json()
            .flatten_event(true)
            .try_init()
            .map_err(|err| anyhow::anyhow!("failed to install JSON subscriber: {err}"))
    } else {
        builder.try_init().map_err(|err| anyhow::anyhow!("failed to install subscriber: {err}"))
    }
}
