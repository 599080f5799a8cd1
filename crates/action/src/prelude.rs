//! Convenience re-exports for destination authors.
//!
//! ```rust,ignore
//! use conduit_action::prelude::*;
//! ```

pub use crate::action::Action;
pub use crate::context::PerformContext;
pub use crate::destination::{Destination, DestinationMode};
pub use crate::device::{SdkHost, initialize_sdk};
pub use crate::error::ActionError;
pub use crate::metadata::ActionDefinition;
pub use crate::output::ActionOutput;
pub use crate::preset::Preset;
pub use crate::readiness::{DEFAULT_POLL_INTERVAL, ReadinessOptions};
pub use crate::request::{HttpRequest, RequestClient, Response};

pub use conduit_core::{ActionKey, DestinationSlug, Event, EventType, Settings};
pub use conduit_mapping::{Mapping, Payload};
pub use conduit_schema::{FieldCollection, FieldDef, SettingDef, SettingType, SettingsSchema};
