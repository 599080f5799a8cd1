//! Configuration presets for common scenarios

use super::{Config, DisplayConfig, Fields, Format};

/// Level variables, highest precedence first.
const LEVEL_VARS: [&str; 2] = ["CONDUIT_LOG", "RUST_LOG"];
const FORMAT_VAR: &str = "CONDUIT_LOG_FORMAT";

impl Config {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    ///
    /// An unknown `CONDUIT_LOG_FORMAT` falls back to compact.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = LEVEL_VARS.iter().find_map(|var| lookup(var)) {
            config.level = level;
        }
        if let Some(format) = lookup(FORMAT_VAR) {
            config.format = format.parse().unwrap_or(Format::Compact);
        }

        config.display.apply_env(&lookup);
        config.fields = Fields::from_lookup(&lookup);
        config
    }

    /// Whether any variable [`Config::from_lookup`] reads is set.
    pub(crate) fn env_present(lookup: impl Fn(&str) -> Option<String>) -> bool {
        LEVEL_VARS.iter().chain([&FORMAT_VAR]).any(|var| lookup(var).is_some())
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_owned(),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_owned(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                flatten: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }
}
