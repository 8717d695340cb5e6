use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pokeworld::config::{BuildConfig, DisconnectedLayout};
use pokeworld::export::{self, OutputPaths};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Bincode,
    Both,
}

#[derive(Parser, Debug)]
#[command(name = "build-world")]
#[command(about = "Render tile images and stitch every map into one world")]
struct Args {
    /// Asset manifest (JSON)
    manifest: PathBuf,

    /// Build configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "out")]
    out: PathBuf,

    /// Root map id, overrides the config
    #[arg(long)]
    root: Option<u16>,

    /// Worker threads, 0 for one per core
    #[arg(long)]
    workers: Option<usize>,

    /// Pack unreachable maps on a grid beside the world
    #[arg(long)]
    grid: bool,

    #[arg(long, value_enum, default_value = "json")]
    format: Format,

    /// Include pixel buffers in world.json
    #[arg(long)]
    pixels: bool,

    /// Skip writing tile PNGs
    #[arg(long)]
    no_png: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = match (args.quiet, args.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let mut config = match &args.config {
        Some(path) => BuildConfig::load(path)?,
        None => BuildConfig::default(),
    };
    if let Some(root) = args.root {
        config.root_map = root;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if args.grid {
        config.disconnected = DisconnectedLayout::Grid;
    }

    let assets = pokeworld::load_bundle(&args.manifest)?;
    let world = pokeworld::build_world(&assets, &config)?;

    let paths = OutputPaths::under(&args.out);
    if !args.no_png {
        write_pngs(&world, &paths)?;
    }
    if matches!(args.format, Format::Json | Format::Both) {
        export::write_world_json(&world, &paths.json, args.pixels)?;
    }
    if matches!(args.format, Format::Bincode | Format::Both) {
        export::write_snapshot(&world, &paths.snapshot)?;
    }

    println!("{}", world.report);
    if !world.report.stitch.is_success() {
        std::process::exit(2);
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_pngs(world: &pokeworld::World, paths: &OutputPaths) -> pokeworld::Result<()> {
    export::write_catalog_pngs(&world.catalog, &paths.images).map(|_| ())
}

#[cfg(not(feature = "png"))]
fn write_pngs(_world: &pokeworld::World, _paths: &OutputPaths) -> pokeworld::Result<()> {
    eprintln!("built without the png feature, skipping tile images");
    Ok(())
}
