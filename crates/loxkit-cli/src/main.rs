//! Command-line interface for LoxKit.
//!
//! Loads a Miniserver structure file from disk, runs the flatten/classify
//! pipeline and prints what the bridge would expose. Useful for checking
//! a config against the accessory limit before pointing a bridge at it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use loxkit_core::config::BridgeConfig;
use loxkit_sitemap::{
    AccessoryKind, ConstructorRegistry, Item, SitemapRegistry, StructureFile, parse_structure,
};

/// LoxKit: plan HomeKit accessories from a Loxone structure file.
#[derive(Parser, Debug)]
#[command(name = "loxkit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a structure file and print the accessory plan.
    Plan {
        /// Path to the structure file (LoxAPP3.json).
        file: PathBuf,
        /// Dump the classified item registry as JSON instead.
        #[arg(long)]
        json: bool,
    },
    /// List rooms and how many items each one holds.
    Rooms {
        /// Path to the structure file (LoxAPP3.json).
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Plan { file, json } => plan(&file, json),
        Command::Rooms { file } => rooms(&file),
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "loxkit=debug" } else { "loxkit=warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_structure(path: &Path) -> Result<StructureFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading structure file {}", path.display()))?;
    let document = StructureFile::from_str(&text)
        .with_context(|| format!("parsing structure file {}", path.display()))?;
    debug!(
        cats = document.cats.len(),
        rooms = document.rooms.len(),
        controls = document.controls.len(),
        "loaded structure file"
    );
    Ok(document)
}

/// What the bridge would expose for one item. A real bridge constructs
/// platform accessory objects here; the CLI only needs the description.
#[derive(Debug, Clone)]
struct AccessoryDescriptor {
    name: String,
    kind: AccessoryKind,
}

fn descriptor_constructors() -> ConstructorRegistry<'static, AccessoryDescriptor> {
    let mut constructors = ConstructorRegistry::new();
    for kind in AccessoryKind::ALL {
        constructors.register(kind, move |item: &Item| AccessoryDescriptor {
            name: item.name.clone(),
            kind,
        });
    }
    constructors
}

fn plan(file: &Path, json: bool) -> Result<()> {
    let config = BridgeConfig::from_env();
    let document = load_structure(file)?;
    let registry = parse_structure(&document, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&registry.items)?);
        return Ok(());
    }

    let accessories = descriptor_constructors().build_all(&registry)?;
    for accessory in &accessories {
        println!("{:<18} {}", accessory.kind.as_tag(), accessory.name);
    }
    println!(
        "{} accessories planned from {} items",
        accessories.len(),
        registry.len()
    );
    Ok(())
}

fn rooms(file: &Path) -> Result<()> {
    let document = load_structure(file)?;
    let registry = SitemapRegistry::flatten(&document);

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for item in registry.items.values() {
        let room = registry.room_name(item.room.as_deref()).to_string();
        *counts.entry(room).or_default() += 1;
    }

    for (room, count) in &counts {
        println!("{count:>4}  {room}");
    }
    println!("{} rooms, {} items", counts.len(), registry.len());
    Ok(())
}
