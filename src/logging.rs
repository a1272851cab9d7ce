//! Structured logging setup.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job. `RUST_LOG` wins over the configured level so a single run
//! can be made noisier without editing the config file.

use std::error::Error;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// Fails if `level` is not a valid filter directive or a subscriber is
/// already installed.
pub fn init_subscriber(level: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
}
