//! # Conduit Log
//!
//! Installs the global `tracing` subscriber for conduit binaries.
//! Library crates only emit events; they never call into this crate.
//!
//! ```rust,no_run
//! let _guard = conduit_log::auto_init().expect("logger");
//! tracing::info!("ready");
//! ```
//!
//! Environment variables read by [`Config::from_env`]:
//!
//! - `CONDUIT_LOG`, then `RUST_LOG`: filter directive
//! - `CONDUIT_LOG_FORMAT`: `pretty`, `compact` or `json`
//! - `NO_COLOR`: disable ANSI colors
//! - `CONDUIT_SERVICE`, `CONDUIT_ENV`: global fields

#![forbid(unsafe_code)]

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Fields, Format};
pub use error::{LogError, LogResult};

/// Initialize with [`Config::default`].
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with an explicit configuration.
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Initialize from the environment when it configures logging, otherwise
/// from the build profile's preset.
pub fn auto_init() -> LogResult<LoggerGuard> {
    init_with(auto_config(|key| std::env::var(key).ok()))
}

fn auto_config(lookup: impl Fn(&str) -> Option<String>) -> Config {
    if Config::env_present(&lookup) {
        Config::from_lookup(lookup)
    } else if cfg!(debug_assertions) {
        Config::development()
    } else {
        Config::production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_config_prefers_env() {
        let config = auto_config(|key| (key == "CONDUIT_LOG_FORMAT").then(|| "json".to_owned()));
        assert_eq!(config.format, Format::Json);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn auto_config_falls_back_to_profile() {
        let config = auto_config(|_| None);
        let expected = if cfg!(debug_assertions) {
            Config::development()
        } else {
            Config::production()
        };
        assert_eq!(config, expected);
    }
}
