//! # Conduit Mapping
//!
//! Binds event data to action payloads.
//!
//! A [`Mapping`] assigns each action field a [`Directive`]: a literal, an
//! `@path` reference into the event, an `@template` string or a nested
//! object of directives. [`default_values`] derives the preset mapping from
//! field definitions; [`build_payload`] resolves a mapping against an
//! event and validates the result against the field schema.
//!
//! ```rust
//! use conduit_core::{Event, EventType};
//! use conduit_mapping::{build_payload, default_values};
//! use conduit_schema::{FieldCollection, FieldDef};
//! use serde_json::json;
//!
//! let fields = FieldCollection::new().with(
//!     "user_keys",
//!     FieldDef::object("User keys")
//!         .required()
//!         .additional_properties()
//!         .with_default(json!({"user_id": {"@path": "$.userId"}})),
//! );
//!
//! let event = Event::new(EventType::Identify).with("userId", json!("u-1"));
//! let mapping = default_values(&fields).unwrap();
//! let payload = build_payload(&fields, &mapping, &event).unwrap();
//!
//! assert_eq!(payload.get("user_keys"), Some(&json!({"user_id": "u-1"})));
//! ```

#![forbid(unsafe_code)]

mod defaults;
mod directive;
mod error;
mod mapping;
mod path;
mod payload;
mod template;

pub use defaults::default_values;
pub use directive::Directive;
pub use error::MappingError;
pub use mapping::{Mapping, resolve};
pub use path::{Path, Segment};
pub use payload::{Payload, build_payload};
pub use template::Template;

pub mod prelude {
    pub use super::{Mapping, MappingError, Payload, build_payload, default_values, resolve};
}
