use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use conduit_action::{ActionInvoker, HttpClient, RequestClient};
use conduit_core::Event;
use conduit_destinations::Catalog;
use conduit_mapping::{Mapping, build_payload, default_values};
use serde_json::{Value, json};

use crate::config::AppConfig;
use crate::dry_run::{DryRunClient, describe};

/// Read a JSON document from `path`, or stdin for `-`.
fn read_json(path: &Path) -> Result<Value> {
    let raw = if path == Path::new("-") {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read stdin")?;
        raw
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn read_event(path: &Path) -> Result<Event> {
    Event::from_value(read_json(path)?)
        .with_context(|| format!("invalid event in {}", path.display()))
}

fn print_pretty(value: &Value) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

pub fn list(catalog: &Catalog, as_json: bool) -> Result<()> {
    let summaries = catalog.summaries();
    if as_json {
        return print_pretty(&serde_json::to_value(&summaries)?);
    }

    let mut out = io::stdout().lock();
    for summary in &summaries {
        let mode = summary.mode.to_string();
        writeln!(out, "{:<20} {mode:<7} {}", summary.slug, summary.name)?;
        let actions: Vec<&str> = summary.actions.iter().map(|k| k.as_str()).collect();
        writeln!(out, "  actions: {}", actions.join(", "))?;
        writeln!(out, "  presets: {}", summary.presets.join(", "))?;
    }
    Ok(())
}

pub fn defaults(catalog: &Catalog, destination: &str, action: &str) -> Result<()> {
    let definition = catalog.definition(destination, action)?;
    let mapping = default_values(&definition.fields)?;
    print_pretty(&mapping.to_value())
}

pub fn resolve(
    catalog: &Catalog,
    destination: &str,
    action: &str,
    event: &Path,
    overrides: Option<&Path>,
) -> Result<()> {
    let definition = catalog.definition(destination, action)?;
    let event = read_event(event)?;

    let defaults = default_values(&definition.fields)?;
    let mapping = match overrides {
        Some(path) => {
            let overrides = Mapping::from_value(&read_json(path)?)
                .with_context(|| format!("invalid mapping in {}", path.display()))?;
            Mapping::merge_overrides(&defaults, &overrides)
        }
        None => defaults,
    };

    let payload = build_payload(&definition.fields, &mapping, &event)
        .with_context(|| format!("cannot resolve {destination}/{action}"))?;
    print_pretty(&payload.into_value())
}

pub async fn send(
    catalog: &Catalog,
    config: &AppConfig,
    event: &Path,
    only: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let event = read_event(event)?;

    let targets: Vec<_> = catalog
        .cloud()
        .iter()
        .filter(|d| only.is_none_or(|slug| d.slug.as_str() == slug))
        .filter_map(|d| config.settings_for(d.slug.as_str()).map(|s| (d, s)))
        .collect();
    if targets.is_empty() {
        match only {
            Some(slug) => bail!("destination `{slug}` is not a configured cloud destination"),
            None => bail!("no cloud destination is configured"),
        }
    }

    let recorder = DryRunClient::default();
    let http;
    let client: &dyn RequestClient = if dry_run {
        &recorder
    } else {
        http = HttpClient::with_config(&config.http)?;
        &http
    };

    let mut out = io::stdout().lock();
    let (mut total, mut failed) = (0_usize, 0_usize);
    for (destination, settings) in targets {
        let invoker = ActionInvoker::new(destination, settings)
            .with_context(|| format!("invalid settings for {}", destination.slug))?;

        for outcome in invoker.dispatch(client, &event).await {
            total += 1;
            let line = match &outcome.result {
                Ok(output) => json!({
                    "destination": destination.slug,
                    "preset": outcome.preset,
                    "action": outcome.action,
                    "status": output.response().map(|r| r.status),
                }),
                Err(err) => {
                    failed += 1;
                    json!({
                        "destination": destination.slug,
                        "preset": outcome.preset,
                        "action": outcome.action,
                        "error": err.to_string(),
                        "code": err.code(),
                        "retryable": err.is_retryable(),
                    })
                }
            };
            writeln!(out, "{line}")?;
        }

        for request in recorder.take() {
            writeln!(out, "{}", json!({"dry_run": describe(&request)}))?;
        }
    }

    if failed > 0 {
        bail!("{failed} of {total} dispatches failed");
    }
    tracing::info!(dispatched = total, "event sent");
    Ok(())
}
