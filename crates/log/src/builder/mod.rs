//! Logger builder implementation

#[macro_use]
mod format;

use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::{Config, Format};
use crate::error::{LogError, LogResult};

type Filtered = Layered<EnvFilter, Registry>;

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Keeps the root span entered for the lifetime of the process.
///
/// Hold it in `main`; dropping it leaves the span carrying the global
/// fields.
#[derive(Debug)]
pub struct LoggerGuard {
    _root_span: Option<tracing::span::EnteredSpan>,
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// The `EnvFilter` this builder would install.
    pub fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level).map_err(|e| LogError::Filter {
            directive: self.config.level.clone(),
            reason: e.to_string(),
        })
    }

    /// Build and install the global subscriber.
    ///
    /// # Errors
    ///
    /// - [`LogError::Filter`] when the level directive does not parse.
    /// - [`LogError::AlreadyInitialized`] when another subscriber is installed.
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = self.filter()?;
        let display = &self.config.display;

        let fmt_layer: Box<dyn Layer<Filtered> + Send + Sync> = match self.config.format {
            Format::Pretty => create_fmt_layer!(tracing_subscriber::fmt::layer().pretty(), display),
            Format::Compact => {
                create_fmt_layer!(tracing_subscriber::fmt::layer().compact(), display)
            }
            Format::Json => create_fmt_layer!(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(display.flatten),
                display
            ),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;

        let fields = &self.config.fields;
        let root_span = (!fields.is_empty()).then(|| {
            tracing::info_span!(
                "app",
                service = fields.service.as_deref().unwrap_or(""),
                env = fields.env.as_deref().unwrap_or(""),
                version = fields.version.as_deref().unwrap_or("")
            )
            .entered()
        });

        tracing::debug!(
            level = %self.config.level,
            format = %self.config.format,
            "logger initialized"
        );

        Ok(LoggerGuard {
            _root_span: root_span,
        })
    }
}
