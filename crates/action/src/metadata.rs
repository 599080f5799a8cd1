use conduit_core::ActionKey;
use conduit_schema::FieldCollection;
use serde::{Deserialize, Serialize};

/// Static description of an action.
///
/// Fields are fixed at construction; the registry only ever hands out
/// shared references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    /// Key presets and callers refer to (`trackEvent`, `identifyUserV2`).
    pub key: ActionKey,
    /// Human-readable title (e.g. `"Track Event"`).
    pub title: String,
    pub description: String,
    /// Subscription applied when a customer enables the action without
    /// choosing one (e.g. `type = "track"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_subscription: Option<String>,
    /// Whether the action is offered for new subscriptions.
    #[serde(default)]
    pub hidden: bool,
    /// Input fields.
    pub fields: FieldCollection,
}

impl ActionDefinition {
    pub fn new(key: ActionKey, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key,
            title: title.into(),
            description: description.into(),
            default_subscription: None,
            hidden: false,
            fields: FieldCollection::new(),
        }
    }

    #[must_use]
    pub fn with_default_subscription(mut self, subscription: impl Into<String>) -> Self {
        self.default_subscription = Some(subscription.into());
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: FieldCollection) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}
