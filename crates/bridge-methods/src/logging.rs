//! Tracing subscriber setup
//!
//! Libraries in this workspace only emit `tracing` events; binaries call
//! [`init`] once at startup. `RUST_LOG` takes precedence over the configured
//! filter. Output goes to stderr so stdout stays free for command results.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter for `config`, falling back to `info` on a bad directive
#[must_use]
pub fn filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber
///
/// Returns `false` when a subscriber was already installed; the existing one
/// is kept.
pub fn init(config: &LoggingConfig) -> bool {
    let (pretty, json) = match config.format {
        LogFormat::Pretty => (Some(fmt::layer().with_writer(std::io::stderr)), None),
        LogFormat::Json => (None, Some(fmt::layer().json().with_writer(std::io::stderr))),
    };

    let installed = tracing_subscriber::registry()
        .with(filter(config))
        .with(pretty)
        .with(json)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(filter = %config.filter, format = ?config.format, "logging initialised");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        let config = LoggingConfig::default();
        init(&config);
        assert!(!init(&config.with_format(LogFormat::Json)));
    }

    #[test]
    fn bad_directive_falls_back() {
        let config = LoggingConfig::default().with_filter("not a [valid filter");
        let _ = filter(&config);
    }
}
