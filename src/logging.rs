//! Opt-in `tracing` subscriber setup.
//!
//! Sessions never install a logger on their own; embedders that already
//! run a `tracing` subscriber keep it. Call [`init`] to get a subscriber
//! shaped by the session configuration: the `log_level` setting feeds an
//! [`EnvFilter`] directive and `log_file` redirects output from stderr
//! into a file.

use std::fs::File;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::SessionConfig;
use crate::error::{Error, Result};

/// Installs a process-global `tracing` subscriber per the configuration.
///
/// `log_level` accepts any `EnvFilter` directive, from a bare level
/// (`"debug"`) to a target filter (`"smart_webdriver=trace"`). With
/// `log_file` set, output goes to that file without ANSI escapes;
/// otherwise it goes to stderr. Calling this when a subscriber is
/// already installed is a no-op.
pub fn init(config: &SessionConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| Error::config(format!("invalid log level '{}': {e}", config.log_level)))?;

    let already_installed = match &config.log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::config(format!("cannot open log file '{}': {e}", path.display()))
            })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .try_init()
                .is_err()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_err(),
    };

    if already_installed {
        tracing::debug!("tracing subscriber already installed, keeping it");
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
