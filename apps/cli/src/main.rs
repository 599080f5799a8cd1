//! `conduit`: resolve analytics events into destination actions.

mod cli;
mod commands;
mod config;
mod dry_run;

use std::io::IsTerminal;

use anyhow::Context;
use clap::Parser;
use conduit_destinations::Catalog;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli).context("failed to load configuration")?;
    if !std::io::stderr().is_terminal() {
        config.log.display.colors = false;
    }
    let _guard =
        conduit_log::init_with(config.log.clone()).context("failed to initialize logging")?;

    let catalog = Catalog::builtin().context("failed to load destinations")?;

    match cli.command {
        Command::List { json } => commands::list(&catalog, json),
        Command::Defaults {
            destination,
            action,
        } => commands::defaults(&catalog, &destination, &action),
        Command::Resolve {
            destination,
            action,
            event,
            mapping,
        } => commands::resolve(&catalog, &destination, &action, &event, mapping.as_deref()),
        Command::Send {
            event,
            destination,
            dry_run,
        } => commands::send(&catalog, &config, &event, destination.as_deref(), dry_run).await,
    }
}
