use async_trait::async_trait;
use conduit_action::prelude::*;
use conduit_schema::ObjectUi;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::{send_event, snake_case};

/// Resolved `trackEvent` fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackEventPayload {
    pub event_name: String,
    pub company_keys: Option<Map<String, Value>>,
    pub user_keys: Option<Map<String, Value>>,
    pub traits: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
struct TrackBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    company: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    traits: Option<Map<String, Value>>,
    event: String,
}

impl From<TrackEventPayload> for TrackBody {
    fn from(p: TrackEventPayload) -> Self {
        Self {
            company: p.company_keys,
            user: p.user_keys,
            traits: p.traits,
            event: snake_case(&p.event_name),
        }
    }
}

/// Send track events to Schematic.
pub struct TrackEvent {
    definition: ActionDefinition,
    endpoint: String,
}

impl TrackEvent {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ActionError> {
        let definition = ActionDefinition::new(
            ActionKey::new("trackEvent")?,
            "Track Event",
            "Send track events to Schematic",
        )
        .with_default_subscription(r#"type = "track""#)
        .with_fields(fields());

        Ok(Self {
            definition,
            endpoint: endpoint.into(),
        })
    }
}

fn fields() -> FieldCollection {
    FieldCollection::new()
        .with(
            "event_name",
            FieldDef::string("Event name")
                .with_description("Name of event (this will be snake cased in request)")
                .required()
                .with_default(json!({"@path": "$.event"})),
        )
        .with(
            "company_keys",
            FieldDef::object("Company keys")
                .with_description(
                    "Key-value pairs associated with a company (e.g. organization_id: 123456)",
                )
                .with_object_ui(ObjectUi::Keyvalue)
                .additional_properties(),
        )
        .with(
            "user_keys",
            FieldDef::object("User keys")
                .with_description(
                    "Key-value pairs associated with a user (e.g. email: example@example.com)",
                )
                .with_object_ui(ObjectUi::Keyvalue)
                .additional_properties()
                .with_property(
                    "user_id",
                    FieldDef::string("User ID").with_description("Your unique ID for your user"),
                )
                .with_default(json!({"user_id": {"@path": "$.userId"}})),
        )
        .with(
            "traits",
            FieldDef::object("Traits")
                .with_description("Additional properties to send with event")
                .with_object_ui(ObjectUi::Keyvalue)
                .additional_properties()
                .with_property(
                    "raw_event_name",
                    FieldDef::string("Raw Event Name").with_description("Event name"),
                )
                .with_default(json!({"raw_event_name": {"@path": "$.event"}})),
        )
}

#[async_trait]
impl Action<dyn RequestClient> for TrackEvent {
    fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    async fn perform(
        &self,
        client: &dyn RequestClient,
        ctx: PerformContext<'_>,
    ) -> Result<ActionOutput, ActionError> {
        let payload: TrackEventPayload = ctx.payload_as()?;
        tracing::debug!(event = %payload.event_name, "schematic track");
        send_event(client, &self.endpoint, ctx, "track", TrackBody::from(payload)).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn event_name_is_snake_cased() {
        let payload: TrackEventPayload = serde_json::from_value(json!({
            "event_name": "Clicked CTA Button",
            "user_keys": {"user_id": "u-1"},
            "traits": {"raw_event_name": "Clicked CTA Button"}
        }))
        .unwrap();
        let body = serde_json::to_value(TrackBody::from(payload)).unwrap();
        assert_eq!(
            body,
            json!({
                "user": {"user_id": "u-1"},
                "traits": {"raw_event_name": "Clicked CTA Button"},
                "event": "clicked_cta_button"
            })
        );
    }
}
