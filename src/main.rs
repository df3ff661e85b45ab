use std::path::PathBuf;

use clap::Parser;
use log::info;
use thiserror::Error;

use periodic_inventory_sim::io::reporting;
use periodic_inventory_sim::simulation::observer::LogObserver;
use periodic_inventory_sim::simulation::replication::run_replications;
use periodic_inventory_sim::{
    ConfigError, InventorySimulation, Scenario, SeededRandom, SimulationError, StatisticsError,
};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Statistics(#[from] StatisticsError),
    #[error("failed to export traces: {0}")]
    Export(String),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Periodic-review inventory simulation
#[derive(Parser, Debug)]
#[command(name = "inventory-sim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scenario JSON file (defaults to the built-in two-product scenario)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed (random and logged when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the scenario horizon, in hours
    #[arg(long)]
    horizon: Option<f64>,

    /// Run this many seeded replications and print a summary instead
    #[arg(long)]
    replications: Option<usize>,

    /// Directory for levels.csv, time_points.csv and orders.csv
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Only export time points and orders up to this time, in hours
    #[arg(long)]
    time_limit: Option<f64>,
}

fn main() -> Result<(), CliError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // 1. SETUP CONFIGURATION
    let mut scenario = match &cli.config {
        Some(path) => Scenario::from_json_file(path)?,
        None => Scenario::default(),
    };
    if let Some(horizon) = cli.horizon {
        scenario.simulation.horizon = horizon;
    }
    scenario.validate()?;

    let rng = SeededRandom::new(cli.seed.unwrap_or_else(rand::random));
    info!("using seed {}", rng.seed());

    // 2. REPLICATIONS
    if let Some(n) = cli.replications {
        let summary = run_replications(&scenario, rng.seed(), n)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    // 3. SINGLE RUN
    let mut sim = InventorySimulation::new(scenario, Box::new(rng))?
        .with_observer(Box::new(LogObserver));
    let profit = sim.run()?;
    info!("simulation completed with profit {:.2}", profit);

    // 4. EXPORT RESULTS
    if let Some(dir) = &cli.output_dir {
        reporting::write_traces(dir, &sim, cli.time_limit)
            .map_err(|e| CliError::Export(e.to_string()))?;
    }

    // 5. PRINT STATISTICS
    let stats = sim.statistics()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
