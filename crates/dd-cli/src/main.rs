//! DungeonDigger floor plan generator
//!
//! Main entry point: builds a configuration from a preset, flags or a JSON
//! file, runs one generation and prints the grid.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use log::{debug, info};
use serde_json::json;
use strum::IntoEnumIterator;

use dd_core::generation::PlacementStrategy;
use dd_core::{GenRng, Generator, GeneratorConfig, GeneratorKind};

/// DungeonDigger floor plan generator
#[derive(Parser, Debug)]
#[command(name = "dungeon-digger")]
#[command(author, version, about = "DungeonDigger - Generate rooms and doors", long_about = None)]
struct Args {
    /// Generator preset (Gaussian, Elimination)
    #[arg(short = 'g', long = "generator", conflicts_with = "config")]
    generator: Option<GeneratorKind>,

    /// Load the whole configuration from a JSON file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Grid height in tiles
    #[arg(long = "height")]
    height: Option<i64>,

    /// Grid width in tiles
    #[arg(long = "width")]
    width: Option<i64>,

    /// Nominal room side length
    #[arg(short = 'r', long = "room-size")]
    room_size: Option<i64>,

    /// Room side variance
    #[arg(long = "variance")]
    variance: Option<i64>,

    /// Gaussian width, in percent of the room size
    #[arg(long = "gaussian-width")]
    gaussian_width: Option<f64>,

    /// Gaussian amplitude
    #[arg(long = "amplitude")]
    amplitude: Option<f64>,

    /// RNG seed (random if omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Do not open any doors
    #[arg(long = "no-doors")]
    no_doors: bool,

    /// Leave the last room without doors
    #[arg(long = "skip-last-room")]
    skip_last_room: bool,

    /// Print the result as JSON instead of a text dump
    #[arg(long = "json")]
    json: bool,

    /// List the available presets and exit
    #[arg(long = "list")]
    list: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    if args.list {
        list_presets();
        return Ok(());
    }

    let config = build_config(&args)?;
    debug!("configuration: {config:?}");

    let generator = Generator::new(&config).context("invalid generator configuration")?;
    let mut rng = match args.seed {
        Some(seed) => GenRng::new(seed),
        None => GenRng::from_entropy(),
    };
    info!("seed {}", rng.seed());

    let plan = generator
        .generate(&mut rng)
        .with_context(|| format!("generation failed (seed {})", rng.seed()))?;
    info!(
        "{} rooms placed, {} connected, {} doors",
        plan.rooms.len(),
        plan.labels.len(),
        plan.door_count()
    );

    if args.json {
        let out = json!({
            "seed": plan.seed,
            "config": config,
            "rooms": plan.rooms,
            "doors": plan.doors,
            "grid": plan.grid,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", plan.grid);
    }
    Ok(())
}

fn init_logging(verbose: u8) -> anyhow::Result<()> {
    use simplelog::LevelFilter::{Debug, Off, Trace, Warn};
    let level = match verbose {
        0 => Warn,
        1 => Debug,
        _ => Trace,
    };
    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}

fn list_presets() {
    for kind in GeneratorKind::iter() {
        let preset = kind.default_config();
        println!(
            "{kind}: {}x{}, room size {} +/- {}",
            preset.height, preset.width, preset.room_size, preset.room_size_variance
        );
    }
}

/// Start from a JSON file or a preset, then apply flag overrides
fn build_config(args: &Args) -> anyhow::Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => args.generator.unwrap_or_default().default_config(),
    };

    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(room_size) = args.room_size {
        config.room_size = room_size;
    }
    if let Some(variance) = args.variance {
        config.room_size_variance = variance;
    }

    match &mut config.strategy {
        PlacementStrategy::Gaussian {
            width_percent,
            amplitude,
        } => {
            if let Some(w) = args.gaussian_width {
                *width_percent = w;
            }
            if let Some(a) = args.amplitude {
                *amplitude = a;
            }
        }
        PlacementStrategy::Elimination => {
            if args.gaussian_width.is_some() || args.amplitude.is_some() {
                bail!("--gaussian-width and --amplitude only apply to the Gaussian generator");
            }
        }
    }

    if args.no_doors {
        config.place_doors = false;
    }
    if args.skip_last_room {
        config.skip_last_room = true;
    }
    Ok(config)
}
