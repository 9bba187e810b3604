//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "STORYC_LOG";

/// Builds the event filter: `STORYC_LOG` when set and valid, otherwise
/// `default_level`.
#[must_use]
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Installs a formatting subscriber writing to standard error.
///
/// Returns `false` when a global subscriber is already installed, which
/// leaves that subscriber in place.
#[must_use]
pub fn init_tracing(default_level: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialisation_is_refused() {
        let _installed = init_tracing("debug");
        assert!(!init_tracing("info"));
    }

    #[test]
    fn default_level_is_used_without_override() {
        assert_eq!(env_filter("warn").to_string(), "warn");
    }
}
