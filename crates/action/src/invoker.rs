use conduit_core::{ActionKey, Event, Settings};
use conduit_mapping::{Mapping, Payload, build_payload, default_values};
use tracing::Instrument;

use crate::context::PerformContext;
use crate::destination::Destination;
use crate::error::ActionError;
use crate::output::ActionOutput;

/// Outcome of one preset fired by [`ActionInvoker::dispatch`].
#[derive(Debug)]
pub struct Dispatch {
    pub preset: String,
    pub action: ActionKey,
    pub result: Result<ActionOutput, ActionError>,
}

/// Runs a destination's actions against events.
///
/// Settings are validated once at construction. Every invocation then
/// resolves the payload, rejects it if a required field is missing and
/// only then calls `perform`, so an invalid event never reaches the
/// vendor.
pub struct ActionInvoker<'d, C: ?Sized + Send + Sync + 'static> {
    destination: &'d Destination<C>,
    settings: Settings,
}

impl<'d, C: ?Sized + Send + Sync + 'static> ActionInvoker<'d, C> {
    pub fn new(destination: &'d Destination<C>, configured: &Settings) -> Result<Self, ActionError> {
        let settings = destination.resolve_settings(configured)?;
        Ok(Self {
            destination,
            settings,
        })
    }

    pub fn destination(&self) -> &'d Destination<C> {
        self.destination
    }

    /// Settings with schema defaults applied.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The mapping an invocation would use: field defaults, then overrides.
    pub fn mapping_for(
        &self,
        action: &str,
        overrides: Option<&Mapping>,
    ) -> Result<Mapping, ActionError> {
        let definition = self.destination.definition(action)?;
        let defaults = default_values(&definition.fields)?;
        Ok(match overrides {
            Some(overrides) => Mapping::merge_overrides(&defaults, overrides),
            None => defaults,
        })
    }

    /// Resolve and validate the payload without performing.
    pub fn prepare(
        &self,
        action: &str,
        mapping: &Mapping,
        event: &Event,
    ) -> Result<Payload, ActionError> {
        let definition = self.destination.definition(action)?;
        Ok(build_payload(&definition.fields, mapping, event)?)
    }

    /// Resolve with the action's defaults (plus overrides) and perform.
    pub async fn invoke(
        &self,
        client: &C,
        action: &str,
        event: &Event,
        overrides: Option<&Mapping>,
    ) -> Result<ActionOutput, ActionError> {
        let mapping = self.mapping_for(action, overrides)?;
        self.invoke_with(client, action, &mapping, event).await
    }

    /// Resolve with exactly `mapping` and perform.
    pub async fn invoke_with(
        &self,
        client: &C,
        action: &str,
        mapping: &Mapping,
        event: &Event,
    ) -> Result<ActionOutput, ActionError> {
        let span = tracing::info_span!(
            "perform",
            destination = %self.destination.slug,
            action = action,
            event_type = %event.event_type(),
        );

        self.run(client, action, mapping, event)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        client: &C,
        action: &str,
        mapping: &Mapping,
        event: &Event,
    ) -> Result<ActionOutput, ActionError> {
        let handler = self.destination.action(action)?;
        let payload = self.prepare(action, mapping, event).inspect_err(|err| {
            tracing::warn!(error = %err, "payload rejected");
        })?;

        let ctx = PerformContext::new(&self.settings, &payload);
        match handler.perform(client, ctx).await {
            Ok(output) => {
                tracing::info!(
                    status = output.response().map(|r| r.status),
                    "action performed"
                );
                Ok(output)
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    code = err.code(),
                    retryable = err.is_retryable(),
                    "action failed"
                );
                Err(err)
            }
        }
    }

    /// Fire every preset whose subscription matches `event`.
    ///
    /// Presets run in declaration order; one failing does not stop the rest.
    pub async fn dispatch(&self, client: &C, event: &Event) -> Vec<Dispatch> {
        let mut outcomes = Vec::new();
        for preset in self.destination.matching_presets(event) {
            let result = self
                .invoke_with(client, preset.partner_action.as_str(), &preset.mapping, event)
                .await;
            outcomes.push(Dispatch {
                preset: preset.name.clone(),
                action: preset.partner_action.clone(),
                result,
            });
        }
        if outcomes.is_empty() {
            tracing::debug!(
                destination = %self.destination.slug,
                event_type = %event.event_type(),
                "no preset matched"
            );
        }
        outcomes
    }
}
