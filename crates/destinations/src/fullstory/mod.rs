//! FullStory (device). Drives the FullStory browser SDK once the page
//! has loaded it.

mod identify_user;
mod sdk;
mod track_event;
mod viewed_page;

use std::sync::Arc;

use conduit_action::prelude::*;
use conduit_mapping::default_values;
use serde_json::{Map, Value, json};

pub use identify_user::{IdentifyUser, IdentifyUserPayload, IdentifyUserV2};
pub use sdk::FullStory;
pub use track_event::{TrackEvent, TrackEventPayload, TrackEventV2};
pub use viewed_page::{ViewedPage, ViewedPagePayload, ViewedPageV2};

pub const SLUG: &str = "actions-fullstory";

/// Passed as `source` on every SDK call.
pub const SEGMENT_EVENT_SOURCE: &str = "segment-browser-actions";

/// Global namespace the snippet installs the API under.
pub const NAMESPACE: &str = "FS";

pub fn destination() -> Result<Destination<dyn FullStory>, ActionError> {
    let track_v2 = TrackEventV2::new()?;
    let identify_v2 = IdentifyUserV2::new()?;
    let page_v2 = ViewedPageV2::new()?;

    let presets = [
        ("Track Event", r#"type = "track""#, track_v2.definition()),
        ("Identify User", r#"type = "identify""#, identify_v2.definition()),
        ("Viewed Page", r#"type = "page""#, page_v2.definition()),
    ]
    .into_iter()
    .map(|(name, subscribe, def)| -> Result<Preset, ActionError> {
        Ok(Preset::new(
            name,
            subscribe,
            def.key.clone(),
            default_values(&def.fields)?,
        )?)
    })
    .collect::<Result<Vec<_>, ActionError>>()?;

    let mut destination =
        Destination::new("Fullstory (Actions)", DestinationSlug::new(SLUG)?, DestinationMode::Device)
            .with_description("Session replay and product analytics through the FullStory SDK.")
            .with_settings(settings_schema())
            .with_action(Arc::new(TrackEvent::new()?))
            .with_action(Arc::new(track_v2))
            .with_action(Arc::new(IdentifyUser::new()?))
            .with_action(Arc::new(identify_v2))
            .with_action(Arc::new(ViewedPage::new()?))
            .with_action(Arc::new(page_v2));
    for preset in presets {
        destination = destination.with_preset(preset);
    }
    Ok(destination)
}

pub fn settings_schema() -> SettingsSchema {
    SettingsSchema::new()
        .with(
            "orgId",
            SettingDef::new("FS Org", SettingType::String)
                .with_description("The organization ID for FullStory.")
                .required(),
        )
        .with(
            "host",
            SettingDef::new("Host", SettingType::String)
                .with_description("The recording server host domain.")
                .with_default(json!("fullstory.com")),
        )
        .with(
            "script",
            SettingDef::new("Script", SettingType::String)
                .with_description("FullStory script host domain.")
                .with_default(json!("edge.fullstory.com")),
        )
        .with(
            "recordCrossDomainIFrames",
            SettingDef::new("Cookie Domain", SettingType::Boolean)
                .with_description("Allows recording cross-domain iFrames.")
                .with_default(json!(false)),
        )
        .with(
            "recordOnlyThisIFrame",
            SettingDef::new("Capture only this iFrame", SettingType::Boolean)
                .with_description("Enables FullStory inside an iframe.")
                .with_default(json!(false)),
        )
        .with(
            "startCaptureManually",
            SettingDef::new("Start capture manually", SettingType::Boolean)
                .with_description("Allow starting Fullstory capture using FS('start').")
                .with_default(json!(false)),
        )
        .with(
            "appHost",
            SettingDef::new("App Host", SettingType::String)
                .with_description("Use this to set the app host for displaying session urls.")
                .with_default(json!("app.fullstory.com")),
        )
        .with(
            "debug",
            SettingDef::new("Debug mode", SettingType::Boolean)
                .with_description("Enables FullStory debug mode.")
                .with_default(json!(false)),
        )
}

/// Globals the FullStory snippet reads, from resolved settings.
///
/// The iframe flags are only written when enabled.
pub fn snippet_config(settings: &Settings) -> Value {
    let flag = |key: &str| settings.get_bool(key).unwrap_or(false);
    let text = |key: &str| settings.get_str(key).map(Value::from).unwrap_or(Value::Null);

    let mut config = Map::new();
    config.insert("_fs_debug".into(), flag("debug").into());
    config.insert("_fs_host".into(), text("host"));
    config.insert("_fs_script".into(), text("script"));
    config.insert("_fs_org".into(), text("orgId"));
    config.insert("_fs_namespace".into(), NAMESPACE.into());
    config.insert(
        "_fs_capture_on_startup".into(),
        (!flag("startCaptureManually")).into(),
    );
    config.insert("_fs_app_host".into(), text("appHost"));
    if flag("recordCrossDomainIFrames") {
        config.insert("_fs_run_in_iframe".into(), true.into());
    }
    if flag("recordOnlyThisIFrame") {
        config.insert("_fs_is_outer_script".into(), true.into());
    }
    Value::Object(config)
}

/// Install the snippet and wait for the SDK handle.
///
/// With no timeout in `options` this waits as long as the host takes.
pub async fn initialize(
    host: &dyn SdkHost<dyn FullStory>,
    settings: &Settings,
    options: ReadinessOptions,
) -> Result<Arc<dyn FullStory>, ActionError> {
    let settings = settings_schema().resolve(settings)?;
    let config = snippet_config(&settings);
    tracing::debug!(org = ?settings.get_str("orgId"), "installing fullstory snippet");
    initialize_sdk(host, &config, DEFAULT_POLL_INTERVAL, options).await
}
