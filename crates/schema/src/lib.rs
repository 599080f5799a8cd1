//! # Conduit Schema
//!
//! Declarative field and settings definitions for destination actions.
//!
//! An action declares its inputs as a [`FieldCollection`] of [`FieldDef`]s;
//! a destination declares its static configuration as a [`SettingsSchema`].
//! Both serialize to the camelCase JSON a mapping UI consumes.

#![forbid(unsafe_code)]

pub mod collection;
pub mod error;
pub mod field;
pub mod settings;
pub mod validation;

pub use collection::FieldCollection;
pub use error::SchemaError;
pub use field::{FieldDef, FieldType, ObjectUi};
pub use settings::{SettingDef, SettingType, SettingsSchema};
pub use validation::{matches_type, validate_value, value_type_name};

pub mod prelude {
    pub use crate::collection::FieldCollection;
    pub use crate::error::SchemaError;
    pub use crate::field::{FieldDef, FieldType, ObjectUi};
    pub use crate::settings::{SettingDef, SettingType, SettingsSchema};
}
