use async_trait::async_trait;
use conduit_action::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{FullStory, SEGMENT_EVENT_SOURCE};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedPagePayload {
    pub page_name: Option<String>,
    pub properties: Option<Map<String, Value>>,
}

impl ViewedPagePayload {
    /// `{pageName, ...properties}`; `pageName` only when set.
    fn page_vars(self) -> Map<String, Value> {
        let mut vars = Map::new();
        if let Some(page_name) = self.page_name {
            vars.insert("pageName".to_owned(), page_name.into());
        }
        vars.extend(self.properties.unwrap_or_default());
        vars
    }
}

fn definition(key: &str, title: &str) -> Result<ActionDefinition, ActionError> {
    Ok(ActionDefinition::new(
        ActionKey::new(key)?,
        title,
        "Sets page properties",
    )
    .with_default_subscription(r#"type = "page""#)
    .with_fields(
        FieldCollection::new()
            .with(
                "pageName",
                FieldDef::string("Page Name")
                    .with_description("The name of the page that was viewed.")
                    .with_default(json!({"@path": "$.name"})),
            )
            .with(
                "properties",
                FieldDef::object("Page Properties")
                    .with_description("The properties of the page that was viewed.")
                    .with_default(json!({"@path": "$.properties"})),
            ),
    ))
}

/// `FS.setVars('page', vars)`.
pub struct ViewedPage {
    definition: ActionDefinition,
}

impl ViewedPage {
    pub fn new() -> Result<Self, ActionError> {
        Ok(Self {
            definition: definition("viewedPage", "Viewed Page")?,
        })
    }
}

#[async_trait]
impl Action<dyn FullStory> for ViewedPage {
    fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    async fn perform(
        &self,
        fs: &dyn FullStory,
        ctx: PerformContext<'_>,
    ) -> Result<ActionOutput, ActionError> {
        let payload: ViewedPagePayload = ctx.payload_as()?;
        fs.set_vars("page", &Value::Object(payload.page_vars()), SEGMENT_EVENT_SOURCE)?;
        Ok(ActionOutput::Sdk)
    }
}

/// `FS('setProperties', {type: 'page', properties})`.
pub struct ViewedPageV2 {
    definition: ActionDefinition,
}

impl ViewedPageV2 {
    pub fn new() -> Result<Self, ActionError> {
        Ok(Self {
            definition: definition("viewedPageV2", "Viewed Page V2")?,
        })
    }
}

#[async_trait]
impl Action<dyn FullStory> for ViewedPageV2 {
    fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    async fn perform(
        &self,
        fs: &dyn FullStory,
        ctx: PerformContext<'_>,
    ) -> Result<ActionOutput, ActionError> {
        let payload: ViewedPagePayload = ctx.payload_as()?;
        let options = json!({"type": "page", "properties": payload.page_vars()});
        fs.call("setProperties", &options, SEGMENT_EVENT_SOURCE)?;
        Ok(ActionOutput::Sdk)
    }
}
