//! SymForge command line front end.
//!
//! Small inspection tool over symbol library elements: print a summary of
//! an element directory (optionally as JSON for scripting) or validate it.
//! Elements are always opened read-only here; this tool never writes.

use std::path::PathBuf;

use eyre::{bail, eyre, Result};
use serde::Serialize;
use symforge_core::{Symbol, Uuid};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: symforge <command> [options]

commands:
  inspect <element-dir> [--json]   print a summary of a symbol element
  validate <element-dir>           load a symbol element and run its checks
";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("inspect") => {
            let json = args.iter().any(|arg| arg == "--json");
            let dir = positional(&args, 1)?;
            inspect(&dir, json)
        }
        Some("validate") => {
            let dir = positional(&args, 1)?;
            validate(&dir)
        }
        Some("help") | Some("--help") | Some("-h") => {
            print!("{USAGE}");
            Ok(())
        }
        Some(other) => bail!("unknown command `{other}`\n{USAGE}"),
        None => bail!("missing command\n{USAGE}"),
    }
}

/// Nth non-flag argument.
fn positional(args: &[String], index: usize) -> Result<PathBuf> {
    args.iter()
        .filter(|arg| !arg.starts_with("--"))
        .nth(index)
        .map(PathBuf::from)
        .ok_or_else(|| eyre!("missing element directory argument\n{USAGE}"))
}

#[derive(Serialize)]
struct SymbolSummary {
    uuid: Uuid,
    name: String,
    version: String,
    author: String,
    deprecated: bool,
    published: bool,
    pins: Vec<PinSummary>,
    polygons: usize,
    circles: usize,
    texts: usize,
}

#[derive(Serialize)]
struct PinSummary {
    uuid: Uuid,
    name: String,
    role: String,
    position_mm: (f64, f64),
    rotation_deg: f64,
    length_mm: f64,
}

impl SymbolSummary {
    fn of(symbol: &Symbol) -> Self {
        SymbolSummary {
            uuid: symbol.uuid(),
            name: symbol.names().default_name().as_str().to_string(),
            version: symbol.version().to_string(),
            author: symbol.author().to_string(),
            deprecated: symbol.deprecated(),
            published: symbol.is_published(),
            pins: symbol
                .pins()
                .iter()
                .map(|pin| PinSummary {
                    uuid: pin.uuid(),
                    name: pin.name().to_string(),
                    role: pin.role().token().to_string(),
                    position_mm: pin.position().to_mm(),
                    rotation_deg: pin.rotation().to_deg(),
                    length_mm: pin.length().to_mm(),
                })
                .collect(),
            polygons: symbol.polygons().len(),
            circles: symbol.circles().len(),
            texts: symbol.texts().len(),
        }
    }
}

fn inspect(dir: &PathBuf, json: bool) -> Result<()> {
    let symbol = Symbol::open(dir, true)?;
    let summary = SymbolSummary::of(&symbol);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Symbol `{}` v{}", summary.name, summary.version);
    println!("  uuid:       {}", summary.uuid);
    println!("  author:     {}", summary.author);
    println!("  deprecated: {}", summary.deprecated);
    println!("  published:  {}", summary.published);
    println!(
        "  geometry:   {} polygons, {} circles, {} texts",
        summary.polygons, summary.circles, summary.texts
    );
    println!("  pins ({}):", summary.pins.len());
    for pin in &summary.pins {
        println!(
            "    - {} ({}) at ({:.2}, {:.2}) mm, {:.1}°, {}",
            pin.name, pin.role, pin.position_mm.0, pin.position_mm.1, pin.rotation_deg, pin.uuid
        );
    }
    Ok(())
}

fn validate(dir: &PathBuf) -> Result<()> {
    let symbol = Symbol::open(dir, true)?;
    info!(uuid = %symbol.uuid(), "element loaded");
    symbol.check_interface_stability()?;
    println!(
        "OK: `{}` ({} pins, published: {})",
        symbol.names().default_name(),
        symbol.pins().len(),
        symbol.is_published()
    );
    Ok(())
}
