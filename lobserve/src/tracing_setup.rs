//! Global `tracing` subscriber installation for binaries.
//!
//! ```no_run
//! lobserve::init_tracing("warn").expect("subscriber installs once");
//! ```

use std::error::Error;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Builds the filter from `directives`, falling back to [`DEFAULT_LOG_LEVEL`]
/// when they do not parse.
pub fn env_filter(directives: &str) -> EnvFilter {
    let directives = directives.trim();
    if directives.is_empty() {
        return EnvFilter::new(DEFAULT_LOG_LEVEL);
    }

    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Installs a `fmt` layer writing to stderr so that stdout stays reserved for
/// conversation output.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing(directives: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter(directives))
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
