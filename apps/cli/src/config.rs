use std::collections::BTreeMap;
use std::path::Path;

use conduit_action::HttpClientConfig;
use conduit_core::Settings;
use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Environment variables owned by conduit-log or clap, not by the
/// nested `CONDUIT_SECTION__KEY` scheme.
const RESERVED_ENV: [&str; 5] = ["log", "log_format", "config", "service", "env"];

/// Looked up from the working directory upward; skipped when absent.
pub const DEFAULT_CONFIG_FILE: &str = "conduit.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log: conduit_log::Config,
    pub http: HttpClientConfig,
    /// Settings per destination slug.
    pub destinations: BTreeMap<String, Settings>,
}

impl AppConfig {
    /// Layer defaults, the config file, the environment and flags.
    pub fn load(cli: &Cli) -> Result<Self, figment::Error> {
        Self::figment(cli.config.as_deref(), cli).extract()
    }

    pub fn figment(path: Option<&Path>, cli: &Cli) -> Figment {
        let file = match path {
            Some(path) => Toml::file_exact(path),
            None => Toml::file(DEFAULT_CONFIG_FILE),
        };
        let mut figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(file)
            .merge(Serialized::default("log", log_env()));

        figment = figment.merge(
            Env::prefixed("CONDUIT_")
                .ignore(&RESERVED_ENV)
                .split("__"),
        );

        if let Some(level) = &cli.log_level {
            figment = figment.merge(Serialized::default("log.level", level));
        }
        if let Some(format) = cli.log_format {
            figment = figment.merge(Serialized::default("log.format", format));
        }
        if let Some(timeout) = cli.timeout {
            figment = figment.merge(Serialized::default("http.timeout", timeout));
        }
        figment
    }

    pub fn settings_for(&self, slug: &str) -> Option<&Settings> {
        self.destinations.get(slug)
    }
}

/// The subset of conduit-log's environment that is actually set.
fn log_env() -> BTreeMap<&'static str, String> {
    let mut env = BTreeMap::new();
    if let Some(level) = ["CONDUIT_LOG", "RUST_LOG"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
    {
        env.insert("level", level);
    }
    if let Ok(format) = std::env::var("CONDUIT_LOG_FORMAT") {
        env.insert("format", format.to_ascii_lowercase());
    }
    env
}
