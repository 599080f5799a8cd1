use std::path::PathBuf;

use clap::{Parser, Subcommand};
use conduit_log::Format;

#[derive(Debug, Parser)]
#[command(name = "conduit")]
#[command(about = "Resolve analytics events into destination actions and send them")]
#[command(version)]
pub struct Cli {
    /// Configuration file. Defaults to `conduit.toml` when present.
    #[arg(long, global = true, env = "CONDUIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter directive (overrides config and environment).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format: pretty, compact or json.
    #[arg(long, global = true)]
    pub log_format: Option<Format>,

    /// HTTP timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List destinations, their actions and presets.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print an action's default mapping.
    Defaults {
        /// Destination slug, e.g. `actions-schematic`.
        destination: String,
        /// Action key, e.g. `identifyUser`.
        action: String,
    },

    /// Resolve an event into an action payload without sending it.
    Resolve {
        destination: String,
        action: String,
        /// Event JSON file, `-` for stdin.
        #[arg(long)]
        event: PathBuf,
        /// Mapping overrides JSON file.
        #[arg(long)]
        mapping: Option<PathBuf>,
    },

    /// Route an event through every configured cloud destination's presets.
    Send {
        /// Event JSON file, `-` for stdin.
        #[arg(long)]
        event: PathBuf,
        /// Only this destination.
        #[arg(long)]
        destination: Option<String>,
        /// Print requests instead of sending them.
        #[arg(long)]
        dry_run: bool,
    },
}
