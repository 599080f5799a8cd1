use std::fmt;
use std::sync::Arc;

use conduit_core::{DestinationSlug, Event, Settings};
use conduit_schema::SettingsSchema;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::ActionError;
use crate::metadata::ActionDefinition;
use crate::preset::Preset;
use crate::registry::ActionRegistry;

/// Where a destination's actions execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationMode {
    /// Server-side: actions issue HTTP requests.
    Cloud,
    /// Client-side: actions call a vendor SDK loaded in the page.
    Device,
}

impl fmt::Display for DestinationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cloud => "cloud",
            Self::Device => "device",
        })
    }
}

/// A vendor integration: settings schema, actions, presets.
///
/// `C` is the client type the actions perform against.
pub struct Destination<C: ?Sized + Send + Sync + 'static> {
    pub name: String,
    pub slug: DestinationSlug,
    pub mode: DestinationMode,
    pub description: String,
    pub settings: SettingsSchema,
    presets: Vec<Preset>,
    actions: ActionRegistry<C>,
}

impl<C: ?Sized + Send + Sync + 'static> Destination<C> {
    pub fn new(name: impl Into<String>, slug: DestinationSlug, mode: DestinationMode) -> Self {
        Self {
            name: name.into(),
            slug,
            mode,
            description: String::new(),
            settings: SettingsSchema::new(),
            presets: Vec::new(),
            actions: ActionRegistry::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SettingsSchema) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: Arc<dyn Action<C>>) -> Self {
        self.actions.register(action);
        self
    }

    #[must_use]
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.presets.push(preset);
        self
    }

    pub fn actions(&self) -> &ActionRegistry<C> {
        &self.actions
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Look up an action, failing with [`ActionError::UnknownAction`].
    pub fn action(&self, key: &str) -> Result<&Arc<dyn Action<C>>, ActionError> {
        self.actions
            .get(key)
            .ok_or_else(|| ActionError::UnknownAction {
                destination: self.slug.to_string(),
                action: key.to_owned(),
            })
    }

    pub fn definition(&self, key: &str) -> Result<&ActionDefinition, ActionError> {
        self.action(key).map(|a| a.definition())
    }

    /// Validate configured settings and apply schema defaults.
    pub fn resolve_settings(&self, configured: &Settings) -> Result<Settings, ActionError> {
        Ok(self.settings.resolve(configured)?)
    }

    /// Presets whose subscription matches `event`.
    ///
    /// A preset with an unparsable subscription is skipped with a warning.
    pub fn matching_presets<'a>(&'a self, event: &'a Event) -> impl Iterator<Item = &'a Preset> {
        self.presets.iter().filter(move |preset| match preset.matches(event) {
            Ok(matched) => matched,
            Err(err) => {
                tracing::warn!(
                    destination = %self.slug,
                    preset = %preset.name,
                    error = %err,
                    "skipping preset with invalid subscription"
                );
                false
            }
        })
    }
}

impl<C: ?Sized + Send + Sync + 'static> fmt::Debug for Destination<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("name", &self.name)
            .field("slug", &self.slug)
            .field("mode", &self.mode)
            .field("actions", &self.actions)
            .field("presets", &self.presets.len())
            .finish()
    }
}
