use conduit_action::{ActionDefinition, ActionError, Destination, DestinationMode, RequestClient};
use conduit_core::ActionKey;
use conduit_schema::SettingsSchema;
use serde::Serialize;
use thiserror::Error;

use crate::fullstory::{self, FullStory};
use crate::schematic;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown destination `{0}`")]
    UnknownDestination(String),

    #[error(transparent)]
    Action(#[from] ActionError),
}

impl CatalogError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownDestination(_) => "CATALOG_UNKNOWN_DESTINATION",
            Self::Action(err) => err.code(),
        }
    }
}

/// One line of `conduit list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationSummary {
    pub name: String,
    pub slug: String,
    pub mode: DestinationMode,
    pub actions: Vec<ActionKey>,
    pub presets: Vec<String>,
}

impl DestinationSummary {
    fn of<C: ?Sized + Send + Sync + 'static>(destination: &Destination<C>) -> Self {
        Self {
            name: destination.name.clone(),
            slug: destination.slug.to_string(),
            mode: destination.mode,
            actions: destination
                .actions()
                .list()
                .into_iter()
                .map(|def| def.key.clone())
                .collect(),
            presets: destination.presets().iter().map(|p| p.name.clone()).collect(),
        }
    }
}

/// Every built-in destination.
///
/// Cloud and device destinations perform against different clients, so
/// they are held apart.
#[derive(Debug)]
pub struct Catalog {
    cloud: Vec<Destination<dyn RequestClient>>,
    device: Vec<Destination<dyn FullStory>>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, ActionError> {
        Ok(Self {
            cloud: vec![schematic::destination()?],
            device: vec![fullstory::destination()?],
        })
    }

    /// Replace the built-in cloud destinations.
    #[must_use]
    pub fn with_cloud(mut self, cloud: Vec<Destination<dyn RequestClient>>) -> Self {
        self.cloud = cloud;
        self
    }

    pub fn cloud(&self) -> &[Destination<dyn RequestClient>] {
        &self.cloud
    }

    pub fn device(&self) -> &[Destination<dyn FullStory>] {
        &self.device
    }

    pub fn summaries(&self) -> Vec<DestinationSummary> {
        self.cloud
            .iter()
            .map(DestinationSummary::of)
            .chain(self.device.iter().map(DestinationSummary::of))
            .collect()
    }

    pub fn find_cloud(&self, slug: &str) -> Option<&Destination<dyn RequestClient>> {
        self.cloud.iter().find(|d| d.slug.as_str() == slug)
    }

    pub fn settings_schema(&self, slug: &str) -> Result<&SettingsSchema, CatalogError> {
        self.find_cloud(slug)
            .map(|d| &d.settings)
            .or_else(|| {
                self.device
                    .iter()
                    .find(|d| d.slug.as_str() == slug)
                    .map(|d| &d.settings)
            })
            .ok_or_else(|| CatalogError::UnknownDestination(slug.to_owned()))
    }

    /// An action's definition on any destination.
    pub fn definition(&self, slug: &str, action: &str) -> Result<&ActionDefinition, CatalogError> {
        if let Some(destination) = self.find_cloud(slug) {
            return Ok(destination.definition(action)?);
        }
        if let Some(destination) = self.device.iter().find(|d| d.slug.as_str() == slug) {
            return Ok(destination.definition(action)?);
        }
        Err(CatalogError::UnknownDestination(slug.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lists_every_destination() {
        let catalog = Catalog::builtin().unwrap();
        let slugs: Vec<String> = catalog.summaries().into_iter().map(|s| s.slug).collect();
        assert_eq!(slugs, vec!["actions-schematic", "actions-fullstory"]);
    }

    #[test]
    fn finds_definitions_across_modes() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            catalog.definition("actions-schematic", "trackEvent").unwrap().title,
            "Track Event"
        );
        assert_eq!(
            catalog.definition("actions-fullstory", "viewedPageV2").unwrap().key.as_str(),
            "viewedPageV2"
        );

        let err = catalog.definition("nope", "trackEvent").unwrap_err();
        assert_eq!(err.code(), "CATALOG_UNKNOWN_DESTINATION");

        let err = catalog.definition("actions-schematic", "nope").unwrap_err();
        assert_eq!(err.code(), "ACTION_UNKNOWN");
    }
}
