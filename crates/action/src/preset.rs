use conduit_core::{ActionKey, Event};
use conduit_mapping::Mapping;
use serde::{Deserialize, Serialize};

use crate::subscription::{Subscription, SubscriptionError};

/// How a preset is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetKind {
    /// Enabled automatically when the destination is connected.
    #[default]
    Automatic,
    /// Offered for a specific event only.
    Specific,
}

/// A static binding from a subscription to an action with a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: String,
    /// Subscription source, e.g. `type = "track"`.
    pub subscribe: String,
    pub partner_action: ActionKey,
    pub mapping: Mapping,
    #[serde(rename = "type", default)]
    pub kind: PresetKind,
}

impl Preset {
    /// Build an automatic preset, checking the subscription parses.
    pub fn new(
        name: impl Into<String>,
        subscribe: impl Into<String>,
        partner_action: ActionKey,
        mapping: Mapping,
    ) -> Result<Self, SubscriptionError> {
        let subscribe = subscribe.into();
        Subscription::parse(&subscribe)?;
        Ok(Self {
            name: name.into(),
            subscribe,
            partner_action,
            mapping,
            kind: PresetKind::Automatic,
        })
    }

    #[must_use]
    pub fn with_kind(mut self, kind: PresetKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn subscription(&self) -> Result<Subscription, SubscriptionError> {
        Subscription::parse(&self.subscribe)
    }

    /// Whether `event` triggers this preset.
    pub fn matches(&self, event: &Event) -> Result<bool, SubscriptionError> {
        Ok(self.subscription()?.matches(event))
    }
}
