//! # Conduit Core
//!
//! Shared vocabulary for the destination-action crates.
//!
//! ## Key Components
//!
//! - **Event**: immutable view over a normalized analytics event
//!   ([`Event`], [`EventType`])
//! - **Settings**: per-destination configuration values ([`Settings`])
//! - **Keys**: validated identifiers for destinations and actions
//!   ([`DestinationSlug`], [`ActionKey`])
//!
//! ## Usage
//!
//! ```rust
//! use conduit_core::{Event, EventType};
//! use serde_json::json;
//!
//! let event = Event::new(EventType::Track)
//!     .with("event", json!("Signed Up"))
//!     .with("userId", json!("u-1"));
//!
//! assert_eq!(event.event_name(), Some("Signed Up"));
//! ```

#![forbid(unsafe_code)]

mod error;
mod event;
mod keys;
mod settings;

pub use error::CoreError;
pub use event::{Event, EventType};
pub use keys::{ActionKey, ActionKeyError, DestinationSlug, SlugError};
pub use settings::Settings;

/// Result type used throughout Conduit core.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Common prelude for Conduit crates
pub mod prelude {
    pub use super::{ActionKey, CoreError, DestinationSlug, Event, EventType, Result, Settings};
}
