use async_trait::async_trait;
use conduit_action::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{FullStory, SEGMENT_EVENT_SOURCE};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyUserPayload {
    pub user_id: Option<String>,
    pub anonymous_id: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub traits: Option<Map<String, Value>>,
}

impl IdentifyUserPayload {
    /// Traits plus display name, email and the anonymous id under
    /// `anonymous_key`.
    fn user_vars(self, anonymous_key: &str) -> Map<String, Value> {
        let mut vars = self.traits.unwrap_or_default();
        if let Some(anonymous_id) = self.anonymous_id {
            vars.insert(anonymous_key.to_owned(), anonymous_id.into());
        }
        if let Some(display_name) = self.display_name {
            vars.insert("displayName".to_owned(), display_name.into());
        }
        if let Some(email) = self.email {
            vars.insert("email".to_owned(), email.into());
        }
        vars
    }
}

fn definition(key: &str, title: &str) -> Result<ActionDefinition, ActionError> {
    let path = |p: &str| json!({"@path": p});
    Ok(ActionDefinition::new(
        ActionKey::new(key)?,
        title,
        "Sets user identity variables",
    )
    .with_default_subscription(r#"type = "identify""#)
    .with_fields(
        FieldCollection::new()
            .with(
                "userId",
                FieldDef::string("User ID")
                    .with_description("The user's id")
                    .with_default(path("$.userId")),
            )
            .with(
                "anonymousId",
                FieldDef::string("Anonymous ID")
                    .with_description("The user's anonymous id")
                    .with_default(path("$.anonymousId")),
            )
            .with(
                "displayName",
                FieldDef::string("Display Name")
                    .with_description("The user's display name")
                    .with_default(path("$.traits.name")),
            )
            .with(
                "email",
                FieldDef::string("Email")
                    .with_description("The user's email")
                    .with_default(path("$.traits.email")),
            )
            .with(
                "traits",
                FieldDef::object("Traits")
                    .with_description("The Segment traits to be forwarded to FullStory")
                    .with_default(path("$.traits")),
            ),
    ))
}

/// `FS.identify(uid, vars)` for known users, `FS.setUserVars(vars)` otherwise.
pub struct IdentifyUser {
    definition: ActionDefinition,
}

impl IdentifyUser {
    pub fn new() -> Result<Self, ActionError> {
        Ok(Self {
            definition: definition("identifyUser", "Identify User")?,
        })
    }
}

#[async_trait]
impl Action<dyn FullStory> for IdentifyUser {
    fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    async fn perform(
        &self,
        fs: &dyn FullStory,
        ctx: PerformContext<'_>,
    ) -> Result<ActionOutput, ActionError> {
        let mut payload: IdentifyUserPayload = ctx.payload_as()?;
        let user_id = payload.user_id.take();
        let vars = Value::Object(payload.user_vars("segmentAnonymousId_str"));

        match user_id {
            Some(uid) => fs.identify(&uid, &vars, SEGMENT_EVENT_SOURCE)?,
            None => fs.set_user_vars(&vars, SEGMENT_EVENT_SOURCE)?,
        }
        Ok(ActionOutput::Sdk)
    }
}

/// `FS('setIdentity', …)` for known users, `FS('setProperties', …)` otherwise.
pub struct IdentifyUserV2 {
    definition: ActionDefinition,
}

impl IdentifyUserV2 {
    pub fn new() -> Result<Self, ActionError> {
        Ok(Self {
            definition: definition("identifyUserV2", "Identify User V2")?,
        })
    }
}

#[async_trait]
impl Action<dyn FullStory> for IdentifyUserV2 {
    fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    async fn perform(
        &self,
        fs: &dyn FullStory,
        ctx: PerformContext<'_>,
    ) -> Result<ActionOutput, ActionError> {
        let mut payload: IdentifyUserPayload = ctx.payload_as()?;
        let user_id = payload.user_id.take();
        let properties = payload.user_vars("segmentAnonymousId");

        match user_id {
            Some(uid) => fs.call(
                "setIdentity",
                &json!({"uid": uid, "properties": properties}),
                SEGMENT_EVENT_SOURCE,
            )?,
            None => fs.call(
                "setProperties",
                &json!({"type": "user", "properties": properties}),
                SEGMENT_EVENT_SOURCE,
            )?,
        }
        Ok(ActionOutput::Sdk)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn vars_merge_traits_and_identity() {
        let payload: IdentifyUserPayload = serde_json::from_value(json!({
            "anonymousId": "anon-1",
            "displayName": "Ada",
            "traits": {"plan": "pro", "email": "old@example.com"},
            "email": "ada@example.com"
        }))
        .unwrap();
        assert_eq!(
            Value::Object(payload.user_vars("segmentAnonymousId_str")),
            json!({
                "plan": "pro",
                "email": "ada@example.com",
                "displayName": "Ada",
                "segmentAnonymousId_str": "anon-1"
            })
        );
    }
}
