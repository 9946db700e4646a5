use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use veloroute_core::{
    Direction, ElevationTier, RouteRequest, SearchOutcome, Terrain, Topology,
};
use veloroute_engine::RouteEngine;

#[derive(Debug, Parser)]
#[command(name = "veloroute-cli")]
#[command(about = "Veloroute command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate route suggestions for a start location and distance.
    Generate {
        /// Start location, free text (e.g. "Roskilde").
        #[arg(long)]
        start: String,
        /// End location; switches the topology to point-to-point.
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        distance_km: f64,
        #[arg(long, value_enum, default_value_t = TierArg::Flat)]
        tier: TierArg,
        #[arg(long, value_enum, default_value_t = TerrainArg::Road)]
        terrain: TerrainArg,
        #[arg(long, value_enum, default_value_t = DirectionArg::None)]
        direction: DirectionArg,
        /// How many route suggestions to produce.
        #[arg(long, default_value_t = 3)]
        count: u32,
        /// Write each route's GPX export into this directory.
        #[arg(long)]
        gpx_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TierArg {
    Flat,
    Hilly,
    Mountainous,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TerrainArg {
    Road,
    Gravel,
    Mtb,
    Mixed,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    None,
    North,
    East,
    South,
    West,
}

impl From<TierArg> for ElevationTier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Flat => ElevationTier::Flat,
            TierArg::Hilly => ElevationTier::Hilly,
            TierArg::Mountainous => ElevationTier::Mountainous,
        }
    }
}

impl From<TerrainArg> for Terrain {
    fn from(arg: TerrainArg) -> Self {
        match arg {
            TerrainArg::Road => Terrain::Road,
            TerrainArg::Gravel => Terrain::Gravel,
            TerrainArg::Mtb => Terrain::Mtb,
            TerrainArg::Mixed => Terrain::Mixed,
        }
    }
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::None => Direction::None,
            DirectionArg::North => Direction::North,
            DirectionArg::East => Direction::East,
            DirectionArg::South => Direction::South,
            DirectionArg::West => Direction::West,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            start,
            end,
            distance_km,
            tier,
            terrain,
            direction,
            count,
            gpx_dir,
        } => {
            let topology = if end.is_some() {
                Topology::PointToPoint
            } else {
                Topology::Loop
            };
            let request = RouteRequest {
                distance_km,
                elevation_tier: tier.into(),
                terrain: terrain.into(),
                topology,
                direction: direction.into(),
                start_text: start,
                end_text: end,
            };

            let config = veloroute_core::load_app_config()?;
            let engine = RouteEngine::from_config(&config)?.with_limits(count, count * 2);
            let routes = engine.generate(&request).await?;

            for route in &routes {
                let marker = match route.outcome {
                    SearchOutcome::Accepted => "",
                    SearchOutcome::Exhausted => " (best effort)",
                };
                println!(
                    "{}{marker}\n  requested {:.1} km, got {:.1} km ({:.0} m climb, ~{}, {})",
                    route.name,
                    route.requested_distance_km,
                    route.candidate.distance_km,
                    route.candidate.elevation_gain_m,
                    route.estimated_time,
                    route.difficulty.label(),
                );
                if let Some(dir) = &gpx_dir {
                    if route.candidate.gpx.is_empty() {
                        println!("  no GPX export available");
                    } else {
                        std::fs::create_dir_all(dir)?;
                        let file = dir.join(format!("{}.gpx", route.id));
                        std::fs::write(&file, &route.candidate.gpx)?;
                        println!("  GPX written to {}", file.display());
                    }
                }
            }
        }
    }

    Ok(())
}
