//! Command-line front end for inspecting and rewriting puzzle chamber files.

use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};

use chamber_core::Chamber;
use chamber_geom::Point3;

#[derive(Parser)]
#[command(name = "chamber", about = "Puzzle chamber authoring tool", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty chamber file.
    New {
        path: PathBuf,
        /// Interior size along X.
        #[arg(long, default_value_t = 5)]
        width: i32,
        /// Interior size along Y.
        #[arg(long, default_value_t = 5)]
        depth: i32,
        /// Interior size along Z.
        #[arg(long, default_value_t = 5)]
        height: i32,
        #[arg(long)]
        title: Option<String>,
    },
    /// Print a summary of a chamber file.
    Info { path: PathBuf },
    /// Parse a chamber file and write it back out.
    Roundtrip { input: PathBuf, output: PathBuf },
}

fn main() {
    env_logger::init();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::New {
            path,
            width,
            depth,
            height,
            title,
        } => {
            let mut chamber = Chamber::new();
            chamber.set_chamber_size(Point3::new(width, depth, height));
            if let Some(title) = title {
                chamber.set_title(title);
            }
            let now = unix_now();
            chamber.set_timestamps(now, now);
            write_chamber(&chamber, &path)?;
            log::info!(target: "cli", "wrote new chamber to {}", path.display());
        }
        Command::Info { path } => {
            let chamber = read_chamber(&path)?;
            print_summary(&chamber);
        }
        Command::Roundtrip { input, output } => {
            let chamber = read_chamber(&input)?;
            write_chamber(&chamber, &output)?;
            log::info!(target: "cli", "rewrote {} to {}", input.display(), output.display());
        }
    }
    Ok(())
}

fn read_chamber(path: &Path) -> Result<Chamber, Box<dyn Error>> {
    warn_extension(path);
    let text = std::fs::read_to_string(path)?;
    Ok(Chamber::from_text(&text)?)
}

fn write_chamber(chamber: &Chamber, path: &Path) -> Result<(), Box<dyn Error>> {
    warn_extension(path);
    std::fs::write(path, chamber.to_text())?;
    Ok(())
}

fn warn_extension(path: &Path) {
    if path.extension().and_then(|e| e.to_str()) != Some("p2c") {
        log::warn!(target: "cli", "{} does not use the .p2c extension", path.display());
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn print_summary(chamber: &Chamber) {
    println!("title:       {}", chamber.title());
    if !chamber.description().is_empty() {
        println!("description: {}", chamber.description());
    }
    let size = chamber.chamber_size();
    println!("size:        {} x {} x {}", size.x, size.y, size.z);
    println!("items:       {}", chamber.item_count());
    println!("connections: {}", chamber.connection_count());

    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, item) in chamber.items() {
        *by_type.entry(item.type_name()).or_default() += 1;
    }
    for (type_name, count) in by_type {
        println!("  {count:>3}  {type_name}");
    }
}
