//! Process-wide `tracing` subscriber setup.

use signals_core::Config;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to the configured `LOG_LEVEL`.
#[must_use]
pub fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Install the global subscriber. Logs go to stderr so that stdout stays
/// free for command output.
///
/// Returns `false` when a subscriber was already installed.
pub fn init(config: &Config) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_falls_back() {
        let config = Config {
            log_level: "not a level[".to_string(),
            ..Config::default()
        };
        // Must not panic regardless of RUST_LOG.
        let _ = env_filter(&config);
    }

    #[test]
    fn second_init_is_rejected() {
        let config = Config::default();
        let _ = init(&config);
        assert!(!init(&config));
    }
}
