//! Device-mode bootstrap.
//!
//! A device destination loads a vendor SDK into the host page and then
//! drives it directly. [`SdkHost`] abstracts the page: it receives the
//! snippet configuration and eventually exposes the SDK handle.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::error::ActionError;
use crate::readiness::{ReadinessOptions, resolve_when};

/// The environment a vendor SDK is loaded into.
pub trait SdkHost<H: ?Sized>: Send + Sync {
    /// Write the global configuration and inject the loader script.
    ///
    /// Returns immediately; the SDK finishes loading in the background.
    fn install(&self, config: &Value) -> Result<(), ActionError>;

    /// The SDK handle, once loaded.
    fn handle(&self) -> Option<Arc<H>>;
}

/// Install the SDK, wait until the host exposes its handle, return it.
pub async fn initialize_sdk<H: ?Sized + Send + Sync>(
    host: &dyn SdkHost<H>,
    config: &Value,
    interval: Duration,
    options: ReadinessOptions,
) -> Result<Arc<H>, ActionError> {
    host.install(config)?;
    resolve_when(|| host.handle().is_some(), interval, options).await?;
    host.handle()
        .ok_or_else(|| ActionError::fatal("SDK handle disappeared after becoming ready"))
}
