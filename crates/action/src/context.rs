use conduit_core::Settings;
use conduit_mapping::Payload;
use serde::de::DeserializeOwned;

use crate::error::ActionError;

/// Inputs to a single `perform` call.
///
/// Both members are borrowed immutably: an action cannot change the
/// settings or payload it was given.
#[derive(Debug, Clone, Copy)]
pub struct PerformContext<'a> {
    /// Resolved destination settings (defaults applied).
    pub settings: &'a Settings,
    /// Resolved and validated payload.
    pub payload: &'a Payload,
}

impl<'a> PerformContext<'a> {
    pub fn new(settings: &'a Settings, payload: &'a Payload) -> Self {
        Self { settings, payload }
    }

    /// Deserialize the payload into the action's typed struct.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, ActionError> {
        Ok(self.payload.deserialize()?)
    }

    /// A string setting that must be present.
    pub fn setting_str(&self, key: &str) -> Result<&'a str, ActionError> {
        self.settings
            .get_str(key)
            .ok_or_else(|| ActionError::validation(format!("settings: `{key}` is not set")))
    }
}
