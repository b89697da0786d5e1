use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use colony_world::{
    fog::RevealMap,
    render::render_ascii,
    scheduler::SweepScheduler,
    snapshot::SnapshotWriter,
    territory::PatrolPresence,
    ColonyId, Config, InMemoryStore, TilePos, TileStore, WorldGateway,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Colony world map runner")]
struct Cli {
    /// Path to the world YAML config (built-in defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the snapshot file backing the world store
    #[arg(long)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register configured colonies and generate their starting area
    Init,
    /// Wipe a colony's world and regenerate it under a new seed
    Reset {
        #[arg(long)]
        colony: Option<String>,
    },
    /// Generate a size × size chunk block around the origin
    Expand {
        #[arg(long)]
        colony: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        size: i32,
    },
    /// Print the colony's map with fog of war
    Map {
        #[arg(long)]
        colony: Option<String>,
    },
    /// Harvest a resource from one tile
    Harvest {
        #[arg(long)]
        colony: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        x: i32,
        #[arg(long, allow_hyphen_values = true)]
        y: i32,
        #[arg(long)]
        kind: String,
        #[arg(long, default_value_t = 0)]
        skill: u32,
    },
    /// Wear a tile as if a cat walked over it
    Walk {
        #[arg(long)]
        colony: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        x: i32,
        #[arg(long, allow_hyphen_values = true)]
        y: i32,
        #[arg(long, default_value_t = colony_world::wear::TRAVERSAL_WEAR)]
        amount: u8,
    },
    /// Run one regeneration and wear-decay sweep over every colony
    Sweep,
    /// Print the territory summary for a colony
    Territory {
        #[arg(long)]
        colony: Option<String>,
    },
    /// Keep sweeping on the configured interval until Ctrl-C or the tick limit
    Run {
        #[arg(long)]
        ticks: Option<u64>,
        /// Override sweep interval in seconds
        #[arg(long)]
        interval_secs: Option<u64>,
    },
}

fn resolve_colony(config: &Config, colony: Option<String>) -> Result<ColonyId> {
    colony
        .or_else(|| config.colonies.first().cloned())
        .map(ColonyId::new)
        .context("no colony given and none configured")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_yaml(path)?,
        None => Config::default_world(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let snapshot_path = cli
        .snapshot
        .clone()
        .unwrap_or_else(|| config.snapshot_path.clone());
    let writer = SnapshotWriter::new(&snapshot_path);
    let store = writer
        .load_or_empty()
        .with_context(|| format!("Failed to load snapshot {}", snapshot_path.display()))?;
    let gateway = WorldGateway::new(store);

    match cli.command {
        Command::Init => {
            for name in &config.colonies {
                let colony = ColonyId::new(name.as_str());
                if gateway.store().colony(&colony)?.is_none() {
                    gateway.create_colony(&colony)?;
                }
                let generated = gateway.expand_revealed_area(
                    &colony,
                    i32::try_from(config.reveal.initial_size).unwrap_or(i32::MAX),
                )?;
                println!("{colony}: generated {generated} tiles");
            }
        }
        Command::Reset { colony } => {
            let colony = resolve_colony(&config, colony)?;
            let report = gateway.reset_world(&colony)?;
            println!(
                "{colony}: seed {} -> {}, deleted {} tiles, generated {}",
                report
                    .previous_seed
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "none".to_string()),
                report.new_seed,
                report.deleted,
                report.generated
            );
        }
        Command::Expand { colony, size } => {
            let colony = resolve_colony(&config, colony)?;
            let generated = gateway.expand_revealed_area(&colony, size)?;
            println!("{colony}: generated {generated} tiles");
        }
        Command::Map { colony } => {
            let colony = resolve_colony(&config, colony)?;
            let tiles = gateway.get_all_tiles(&colony)?;
            let reveal = RevealMap::from_tiles(&tiles);
            print!("{}", render_ascii(&tiles, &reveal));
        }
        Command::Harvest {
            colony,
            x,
            y,
            kind,
            skill,
        } => {
            let colony = resolve_colony(&config, colony)?;
            let taken = gateway.harvest_named(&colony, TilePos::new(x, y), &kind, skill)?;
            println!("{colony}: harvested {taken} {kind} at ({x}, {y})");
        }
        Command::Walk {
            colony,
            x,
            y,
            amount,
        } => {
            let colony = resolve_colony(&config, colony)?;
            let wear = gateway.add_wear(&colony, TilePos::new(x, y), amount)?;
            println!("{colony}: wear at ({x}, {y}) is now {wear}");
        }
        Command::Sweep => {
            let mut scheduler = SweepScheduler::new();
            let stats = scheduler.tick(&gateway)?;
            println!(
                "swept {} colonies ({} skipped): {} regenerated, {} wear decayed",
                stats.colonies_swept,
                stats.colonies_skipped,
                stats.totals.regenerated,
                stats.totals.wear_decayed
            );
        }
        Command::Territory { colony } => {
            let colony = resolve_colony(&config, colony)?;
            let summary = gateway.territory_summary(&colony, &PatrolPresence::new())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Run {
            ticks,
            interval_secs,
        } => {
            let max_ticks = ticks.or(config.sweep.max_ticks);
            let interval =
                Duration::from_secs(interval_secs.unwrap_or(config.sweep.interval_secs).max(1));
            run_sweeps(&gateway, &writer, interval, max_ticks).await?;
        }
    }

    writer.write(gateway.store(), gateway.now())?;
    Ok(())
}

async fn run_sweeps(
    gateway: &WorldGateway<InMemoryStore>,
    writer: &SnapshotWriter,
    interval: Duration,
    max_ticks: Option<u64>,
) -> Result<()> {
    let mut scheduler = SweepScheduler::new();
    let mut timer = tokio::time::interval(interval);
    info!(interval_secs = interval.as_secs(), ?max_ticks, "sweep loop started");
    loop {
        tokio::select! {
            _ = timer.tick() => {
                scheduler.tick(gateway)?;
                writer.write(gateway.store(), gateway.now())?;
                if max_ticks.is_some_and(|limit| scheduler.tick_count() >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
        }
    }
    if let Some(average) = scheduler.average_tick_time() {
        info!(ticks = scheduler.tick_count(), ?average, "sweep loop stopped");
    }
    Ok(())
}
