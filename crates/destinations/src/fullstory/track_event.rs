use async_trait::async_trait;
use conduit_action::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{FullStory, SEGMENT_EVENT_SOURCE};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackEventPayload {
    pub name: String,
    pub properties: Option<Map<String, Value>>,
}

fn definition(key: &str, title: &str) -> Result<ActionDefinition, ActionError> {
    Ok(
        ActionDefinition::new(ActionKey::new(key)?, title, "Track events")
            .with_default_subscription(r#"type = "track""#)
            .with_fields(
                FieldCollection::new()
                    .with(
                        "name",
                        FieldDef::string("Name")
                            .with_description("The name of the event.")
                            .required()
                            .with_default(json!({"@path": "$.event"})),
                    )
                    .with(
                        "properties",
                        FieldDef::object("Properties")
                            .with_description(
                                "A JSON object containing additional information about the \
                                 event that will be indexed by FullStory.",
                            )
                            .with_default(json!({"@path": "$.properties"})),
                    ),
            ),
    )
}

/// `FS.event(name, properties)`.
pub struct TrackEvent {
    definition: ActionDefinition,
}

impl TrackEvent {
    pub fn new() -> Result<Self, ActionError> {
        Ok(Self {
            definition: definition("trackEvent", "Track Event")?,
        })
    }
}

#[async_trait]
impl Action<dyn FullStory> for TrackEvent {
    fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    async fn perform(
        &self,
        fs: &dyn FullStory,
        ctx: PerformContext<'_>,
    ) -> Result<ActionOutput, ActionError> {
        let payload: TrackEventPayload = ctx.payload_as()?;
        let properties = Value::Object(payload.properties.unwrap_or_default());
        fs.event(&payload.name, &properties, SEGMENT_EVENT_SOURCE)?;
        Ok(ActionOutput::Sdk)
    }
}

/// `FS('trackEvent', {name, properties})`.
pub struct TrackEventV2 {
    definition: ActionDefinition,
}

impl TrackEventV2 {
    pub fn new() -> Result<Self, ActionError> {
        Ok(Self {
            definition: definition("trackEventV2", "Track Event V2")?,
        })
    }
}

#[async_trait]
impl Action<dyn FullStory> for TrackEventV2 {
    fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    async fn perform(
        &self,
        fs: &dyn FullStory,
        ctx: PerformContext<'_>,
    ) -> Result<ActionOutput, ActionError> {
        let payload: TrackEventPayload = ctx.payload_as()?;
        let options = json!({
            "name": payload.name,
            "properties": payload.properties.unwrap_or_default(),
        });
        fs.call("trackEvent", &options, SEGMENT_EVENT_SOURCE)?;
        Ok(ActionOutput::Sdk)
    }
}
