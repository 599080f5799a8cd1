//! # Conduit Action
//!
//! The runtime side of a destination: what an action is, how it is
//! registered, how events reach it.
//!
//! ## Core Types
//!
//! - [`Action`]: field schema plus a `perform` step against a client `C`
//! - [`Destination`]: settings schema, actions and presets for one vendor
//! - [`ActionInvoker`]: resolves a mapping, validates, then performs
//! - [`Preset`] / [`Subscription`]: which events trigger which action
//! - [`RequestClient`]: the HTTP seam cloud actions perform against
//! - [`resolve_when`] / [`initialize_sdk`]: device-mode SDK readiness
//! - [`ActionError`]: retryable vs. fatal failures
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use conduit_action::prelude::*;
//! use async_trait::async_trait;
//!
//! struct Ping { def: ActionDefinition }
//!
//! #[async_trait]
//! impl Action<dyn RequestClient> for Ping {
//!     fn definition(&self) -> &ActionDefinition { &self.def }
//!
//!     async fn perform(
//!         &self,
//!         client: &dyn RequestClient,
//!         ctx: PerformContext<'_>,
//!     ) -> Result<ActionOutput, ActionError> {
//!         let request = HttpRequest::post("https://example.com/ping")
//!             .json(ctx.payload.to_value());
//!         Ok(ActionOutput::http(client.send(request).await?))
//!     }
//! }
//! ```

#![forbid(unsafe_code)]

/// The [`Action`] trait.
pub mod action;
/// Per-invocation inputs handed to `perform`.
pub mod context;
/// Destination definitions.
pub mod destination;
pub mod device;
/// Error types.
pub mod error;
/// Mapping resolution and dispatch.
pub mod invoker;
/// Static action descriptors.
pub mod metadata;
pub mod output;
pub mod prelude;
/// Preset bindings.
pub mod preset;
pub mod readiness;
/// Registry of actions keyed by [`ActionKey`](conduit_core::ActionKey).
pub mod registry;
/// HTTP request seam.
pub mod request;
/// Preset trigger expressions.
pub mod subscription;

pub use action::Action;
pub use context::PerformContext;
pub use destination::{Destination, DestinationMode};
pub use device::{SdkHost, initialize_sdk};
pub use error::ActionError;
pub use invoker::{ActionInvoker, Dispatch};
pub use metadata::ActionDefinition;
pub use output::ActionOutput;
pub use preset::{Preset, PresetKind};
pub use readiness::{DEFAULT_POLL_INTERVAL, ReadinessOptions, resolve_when};
pub use registry::ActionRegistry;
pub use request::{
    DEFAULT_TIMEOUT, HttpClient, HttpClientConfig, HttpRequest, RequestClient, RequestError,
    Response, ResponseStatusCategory,
};
pub use subscription::{Subscription, SubscriptionError};
