//! ViaConf command-line tool: entry point.
//!
//! Runs the same load → merge → normalize → persist pipeline a host plugin
//! runs on boot, against a data directory on disk, and lets an operator
//! inspect or change the result.
//!
//! # Usage
//!
//! ```text
//! viaconf [OPTIONS] <COMMAND>
//!
//! Commands:
//!   show                 Print the effective config with template comments
//!   get <KEY>            Print one option as JSON
//!   set <KEY> <JSON>     Overwrite one top-level option and save
//!   reload               Re-run the pipeline and persist the result
//!   settings             Print the structured settings record
//!   protocol <PLAYER>    Print a player's client protocol, -1 if unknown
//!
//! Options:
//!   --platform <velocity|bungee|bukkit>  [default: bukkit]
//!   --data-dir <DIR>                     [default: .]
//!   --template <FILE>                    Override the bundled template
//!   --lowest-protocol <ID>               Host's lowest supported protocol
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable           | Default  | Description                  |
//! |--------------------|----------|------------------------------|
//! | `VIACONF_PLATFORM` | `bukkit` | Host platform                |
//! | `VIACONF_DATA_DIR` | `.`      | Directory of `config.json`   |
//!
//! Every command opens the store first, which runs a full reload and writes
//! the migrated file back, exactly like a plugin start.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use viaconf_host::application::companion::client_protocol;
use viaconf_host::application::platform::ProtocolHost;
use viaconf_host::infrastructure::platform::{
    build, FixedProtocolHost, PlatformKind, RegistryProtocolHost,
};
use viaconf_host::{ConfigStore, OptionSource, TemplateLocation};

/// Name of the persisted file inside the data directory.
const CONFIG_FILE: &str = "config.json";

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inspect and edit a ViaConf configuration file.
#[derive(Debug, Parser)]
#[command(name = "viaconf", about = "Load, migrate and edit ViaConf settings", version)]
struct Cli {
    /// Host platform whose unsupported options and normalisation apply.
    #[arg(long, value_enum, default_value_t = PlatformKind::Bukkit, env = "VIACONF_PLATFORM")]
    platform: PlatformKind,

    /// Directory holding `config.json`. Created on first save.
    #[arg(long, default_value = ".", env = "VIACONF_DATA_DIR")]
    data_dir: PathBuf,

    /// Template file to use instead of the bundled one.
    #[arg(long)]
    template: Option<PathBuf>,

    /// Lowest protocol id the host supports, used for the `default` server
    /// entry. Defaults to the oldest known release.
    #[arg(long)]
    lowest_protocol: Option<i32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the effective config with the template's comments.
    Show,
    /// Print one option as JSON.
    Get {
        /// Top-level key or dotted path.
        key: String,
    },
    /// Overwrite one top-level option with a JSON value and save.
    ///
    /// Only keys already present at the top level are accepted; anything
    /// else would be dropped by the next reload.
    Set {
        key: String,
        /// JSON value, e.g. `800`, `true` or `'"text"'`.
        value: String,
    },
    /// Re-run the load pipeline and persist the result.
    Reload,
    /// Print the structured settings record as JSON.
    Settings,
    /// Print the client protocol the companion plugin reports for a player.
    Protocol { player: String },
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    fn protocol_host(&self) -> Arc<dyn ProtocolHost> {
        match self.lowest_protocol {
            Some(id) => Arc::new(FixedProtocolHost(id)),
            None => Arc::new(RegistryProtocolHost),
        }
    }

    /// Builds the store for the selected platform and runs the first reload.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is missing or malformed, or the
    /// existing config file cannot be read.
    fn open_store(&self) -> anyhow::Result<ConfigStore> {
        let platform = build(self.platform, self.protocol_host());
        let mut store = ConfigStore::new(self.config_path(), platform);
        if let Some(template) = &self.template {
            store = store.with_template(TemplateLocation::File(template.clone()));
        }
        store
            .reload()
            .with_context(|| format!("failed to load {}", self.config_path().display()))?;
        Ok(store)
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let store = cli.open_store()?;

    match cli.command {
        Command::Show => print!("{}", store.rendered()?),
        Command::Get { key } => {
            let value = store
                .value(&key)
                .with_context(|| format!("option {key} is not set"))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Set { key, value } => {
            ensure_top_level(&store, &key)?;
            let parsed: serde_json::Value = serde_json::from_str(&value)
                .with_context(|| format!("value for {key} is not valid JSON: {value}"))?;
            store.set(&key, parsed);
            store.save()?;
        }
        Command::Reload => info!(
            path = %store.path().display(),
            options = store.values().len(),
            "reload complete"
        ),
        Command::Settings => {
            println!("{}", serde_json::to_string_pretty(&store.settings())?);
        }
        Command::Protocol { player } => {
            let companion = store.platform().companion();
            println!("{}", client_protocol(companion.as_ref(), &player));
        }
    }
    Ok(())
}

/// Rejects keys that `ConfigStore::set` would store but the next reload
/// would drop, such as dotted paths or options absent from the template.
fn ensure_top_level(store: &ConfigStore, key: &str) -> anyhow::Result<()> {
    if store.values().contains_key(key) {
        return Ok(());
    }
    anyhow::bail!(
        "{key} is not a top-level option of this platform's template; set its parent option instead"
    )
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `show` and `get` output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
