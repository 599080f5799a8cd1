use async_trait::async_trait;
use conduit_action::prelude::*;
use conduit_schema::ObjectUi;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::send_event;

/// Resolved `identifyUser` fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdentifyUserPayload {
    pub company_keys: Option<Map<String, Value>>,
    pub company_name: Option<String>,
    pub company_traits: Option<Map<String, Value>>,
    pub user_keys: Map<String, Value>,
    pub user_name: Option<String>,
    pub user_traits: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
struct IdentifyBody {
    company: CompanyBody,
    keys: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    traits: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
struct CompanyBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    keys: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    traits: Option<Map<String, Value>>,
}

impl From<IdentifyUserPayload> for IdentifyBody {
    fn from(p: IdentifyUserPayload) -> Self {
        Self {
            company: CompanyBody {
                keys: p.company_keys,
                name: p.company_name,
                traits: p.company_traits,
            },
            keys: p.user_keys,
            name: p.user_name,
            traits: p.user_traits,
        }
    }
}

/// Send identify events to Schematic.
pub struct IdentifyUser {
    definition: ActionDefinition,
    endpoint: String,
}

impl IdentifyUser {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ActionError> {
        let definition = ActionDefinition::new(
            ActionKey::new("identifyUser")?,
            "Identify User",
            "Send identify events to Schematic",
        )
        .with_default_subscription(r#"type = "identify""#)
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
            "company_keys",
            FieldDef::object("Company key name")
                .with_description(
                    "Key-value pairs associated with a company (e.g. organization_id: 123456)",
                )
                .with_object_ui(ObjectUi::Keyvalue)
                .additional_properties(),
        )
        .with(
            "company_name",
            FieldDef::string("Company name")
                .with_description("Name of company")
                .with_default(json!({"@path": "$.traits.company_name"})),
        )
        .with(
            "company_traits",
            FieldDef::object("Company traits")
                .with_description("Properties associated with company")
                .with_object_ui(ObjectUi::Keyvalue),
        )
        .with(
            "user_keys",
            FieldDef::object("User keys")
                .with_description(
                    "Key-value pairs associated with a user (e.g. email: example@example.com)",
                )
                .with_object_ui(ObjectUi::Keyvalue)
                .required()
                .additional_properties()
                .with_property(
                    "user_id",
                    FieldDef::string("User ID").with_description("Your unique ID for your user"),
                )
                .with_default(json!({"user_id": {"@path": "$.userId"}})),
        )
        .with(
            "user_name",
            FieldDef::string("User name")
                .with_description("User's full name")
                .with_default(json!({"@path": "$.traits.name"})),
        )
        .with(
            "user_traits",
            FieldDef::object("User traits")
                .with_description("Properties associated with user")
                .with_object_ui(ObjectUi::Keyvalue),
        )
}

#[async_trait]
impl Action<dyn RequestClient> for IdentifyUser {
    fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    async fn perform(
        &self,
        client: &dyn RequestClient,
        ctx: PerformContext<'_>,
    ) -> Result<ActionOutput, ActionError> {
        let payload: IdentifyUserPayload = ctx.payload_as()?;
        send_event(
            client,
            &self.endpoint,
            ctx,
            "identify",
            IdentifyBody::from(payload),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn undefined_members_are_omitted() {
        let payload: IdentifyUserPayload =
            serde_json::from_value(json!({"user_keys": {"user_id": "u-1"}})).unwrap();
        let body = serde_json::to_value(IdentifyBody::from(payload)).unwrap();
        assert_eq!(body, json!({"company": {}, "keys": {"user_id": "u-1"}}));
    }

    #[test]
    fn company_is_nested() {
        let payload: IdentifyUserPayload = serde_json::from_value(json!({
            "company_keys": {"org": 7},
            "company_name": "Acme",
            "user_keys": {"user_id": "u-1"},
            "user_name": "Ada",
            "user_traits": {"plan": "pro"}
        }))
        .unwrap();
        let body = serde_json::to_value(IdentifyBody::from(payload)).unwrap();
        assert_eq!(
            body,
            json!({
                "company": {"keys": {"org": 7}, "name": "Acme"},
                "keys": {"user_id": "u-1"},
                "name": "Ada",
                "traits": {"plan": "pro"}
            })
        );
    }
}
