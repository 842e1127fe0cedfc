use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use std::io::Write;
use std::path::PathBuf;
use std::process;

use elevator::simulation::coordinator::Simulation;
use elevator::simulation::passenger::Passenger;
use elevator::util::config::Config;
use elevator::util::constants::Floor;

/// Simulate an elevator system.
#[derive(Debug, Parser)]
struct Args {
    /// Json file with the scenario settings. Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of passengers an elevator can carry.
    #[arg(long)]
    max_passengers: Option<usize>,

    /// Number of elevators.
    #[arg(long)]
    num_elevators: Option<usize>,

    /// Number of floors in the building.
    #[arg(long)]
    floors: Option<Floor>,

    /// Length of one tick in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for assigning passengers to elevators.
    #[arg(long)]
    seed: Option<u64>,

    /// Current and destination floor of each passenger, written as `from=to`.
    #[arg(long, required = true, num_args = 1.., value_parser = parse_passenger)]
    passengers: Vec<(Floor, Floor)>,
}

fn parse_passenger(s: &str) -> Result<(Floor, Floor)> {
    let (from, to) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected `from=to`, got `{}`", s))?;
    let from = from.trim().parse().with_context(|| format!("bad floor in `{}`", s))?;
    let to = to.trim().parse().with_context(|| format!("bad floor in `{}`", s))?;
    Ok((from, to))
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(v) = args.max_passengers {
        config.max_passengers = v;
    }
    if let Some(v) = args.num_elevators {
        config.num_elevators = v;
    }
    if let Some(v) = args.floors {
        config.num_floors = v;
    }
    if let Some(v) = args.tick_ms {
        config.tick_period_ms = v;
    }
    if args.seed.is_some() {
        config.assignment_seed = args.seed;
    }
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    config.print();

    let simulation = Simulation::new(config)?;
    let passengers: Vec<Passenger> = args
        .passengers
        .iter()
        .map(|&(from, to)| Passenger::new(from, to))
        .collect();

    let summary = simulation.run(passengers)?;
    info!(
        "Delivered {} passengers after {} position reports",
        summary.delivered, summary.reports_seen
    );
    for unit in summary.units.iter() {
        info!("Elevator {} finished at floor {}", unit.id, unit.floor);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            )
        })
        .init();

    if let Err(e) = run(Args::parse()) {
        error!("{:#}", e);
        process::exit(1);
    }
}
