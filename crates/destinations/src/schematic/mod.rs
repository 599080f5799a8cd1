//! Schematic (cloud). Forwards identify and track events to the
//! Schematic events API.

mod identify_user;
mod track_event;

use std::sync::Arc;

use conduit_action::prelude::*;
use conduit_mapping::default_values;
use serde::Serialize;

pub use identify_user::{IdentifyUser, IdentifyUserPayload};
pub use track_event::{TrackEvent, TrackEventPayload};

pub const SLUG: &str = "actions-schematic";
pub const EVENTS_URL: &str = "https://api.schematichq.com/events";
pub const API_KEY_HEADER: &str = "X-Schematic-Api-Key";

/// The Schematic destination posting to [`EVENTS_URL`].
pub fn destination() -> Result<Destination<dyn RequestClient>, ActionError> {
    destination_with_endpoint(EVENTS_URL)
}

/// The Schematic destination posting to `endpoint` instead.
pub fn destination_with_endpoint(
    endpoint: impl Into<String>,
) -> Result<Destination<dyn RequestClient>, ActionError> {
    let endpoint = endpoint.into();
    let identify = IdentifyUser::new(endpoint.clone())?;
    let track = TrackEvent::new(endpoint)?;

    let identify_preset = Preset::new(
        "Identify User",
        r#"type = "identify""#,
        identify.definition().key.clone(),
        default_values(&identify.definition().fields)?,
    )?;
    let track_preset = Preset::new(
        "Track Event",
        r#"type = "track""#,
        track.definition().key.clone(),
        default_values(&track.definition().fields)?,
    )?;

    Ok(
        Destination::new("Schematic", DestinationSlug::new(SLUG)?, DestinationMode::Cloud)
            .with_description("Send identify and track events to Schematic.")
            .with_settings(settings_schema())
            .with_action(Arc::new(identify))
            .with_action(Arc::new(track))
            .with_preset(identify_preset)
            .with_preset(track_preset),
    )
}

pub fn settings_schema() -> SettingsSchema {
    SettingsSchema::new().with(
        "apiKey",
        SettingDef::new("API Key", SettingType::Password)
            .with_description("Your Schematic API key.")
            .required(),
    )
}

/// Schematic's event name normalization.
///
/// Splits on single spaces, joins with `_` and lowercases. Camel case
/// is not split: `"SignedUp"` becomes `"signedup"`.
pub fn snake_case(s: &str) -> String {
    s.split(' ').collect::<Vec<_>>().join("_").to_lowercase()
}

#[derive(Debug, Serialize)]
struct Envelope<B> {
    body: B,
    event_type: &'static str,
}

/// POST one event. Both actions share this.
async fn send_event<B: Serialize + Send>(
    client: &dyn RequestClient,
    endpoint: &str,
    ctx: PerformContext<'_>,
    event_type: &'static str,
    body: B,
) -> Result<ActionOutput, ActionError> {
    let api_key = ctx.setting_str("apiKey")?;
    let json = serde_json::to_value(Envelope { body, event_type })?;

    let request = HttpRequest::post(endpoint)
        .header(API_KEY_HEADER, api_key)
        .json(json);
    let response = client.send(request).await?;
    Ok(ActionOutput::http(response))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("Signed Up", "signed_up")]
    #[case("Clicked CTA Button", "clicked_cta_button")]
    #[case("SignedUp", "signedup")]
    #[case("already_snake", "already_snake")]
    #[case("double  space", "double__space")]
    #[case("", "")]
    fn snake_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(snake_case(input), expected);
    }

    #[test]
    fn destination_shape() {
        let dest = destination().unwrap();
        assert_eq!(dest.slug.as_str(), SLUG);
        assert_eq!(dest.mode, DestinationMode::Cloud);
        assert_eq!(
            dest.actions().list().iter().map(|d| d.key.as_str()).collect::<Vec<_>>(),
            vec!["identifyUser", "trackEvent"]
        );
        assert!(dest.settings.get("apiKey").unwrap().is_sensitive());
    }

    #[test]
    fn presets_carry_default_mappings() {
        let dest = destination().unwrap();
        let identify = &dest.presets()[0];
        assert_eq!(identify.partner_action.as_str(), "identifyUser");
        assert_eq!(
            identify.mapping.to_value(),
            json!({
                "company_name": {"@path": "$.traits.company_name"},
                "user_keys": {"user_id": {"@path": "$.userId"}},
                "user_name": {"@path": "$.traits.name"}
            })
        );

        let track = &dest.presets()[1];
        assert_eq!(track.subscribe, r#"type = "track""#);
        assert_eq!(
            track.mapping.to_value(),
            json!({
                "event_name": {"@path": "$.event"},
                "user_keys": {"user_id": {"@path": "$.userId"}},
                "traits": {"raw_event_name": {"@path": "$.event"}}
            })
        );
    }
}
