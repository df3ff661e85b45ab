// src/simulation/replication.rs

use serde::Serialize;

use crate::error::{ConfigError, SimulationError};
use crate::simulation::config::Scenario;
use crate::simulation::engine::InventorySimulation;
use crate::simulation::observer::SilentObserver;
use crate::simulation::random::SeededRandom;

/// Aggregate of several independently seeded runs of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicationSummary {
    pub runs: usize,
    /// Runs whose first arrival fell beyond the horizon. Excluded below.
    pub empty_horizon_runs: usize,
    pub mean_profit: f64,
    pub std_dev_profit: f64,
    pub min_profit: f64,
    pub max_profit: f64,
    pub mean_satisfied_ratio: f64,
}

/// Runs `n` simulations seeded `base_seed`, `base_seed + 1`, ... one after
/// another.
pub fn run_replications(
    scenario: &Scenario,
    base_seed: u64,
    n: usize,
) -> Result<ReplicationSummary, SimulationError> {
    if n == 0 {
        return Err(ConfigError::ZeroReplications.into());
    }

    let mut profits = Vec::with_capacity(n);
    let mut ratios = Vec::with_capacity(n);
    let mut empty_horizon_runs = 0;

    for i in 0..n {
        let seed = base_seed.wrapping_add(i as u64);
        let mut sim =
            InventorySimulation::new(scenario.clone(), Box::new(SeededRandom::new(seed)))?
                .with_observer(Box::new(SilentObserver));

        match sim.run() {
            Ok(profit) => {
                profits.push(profit);
                if let Ok(ratio) = sim.satisfied_ratio() {
                    ratios.push(ratio);
                }
            }
            Err(SimulationError::EmptyHorizon { .. }) => empty_horizon_runs += 1,
            Err(e) => return Err(e),
        }
    }

    let mean = |values: &[f64]| {
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    };

    let mean_profit = mean(&profits);
    let variance = mean(
        &profits
            .iter()
            .map(|p| (p - mean_profit).powi(2))
            .collect::<Vec<_>>(),
    );

    Ok(ReplicationSummary {
        runs: n,
        empty_horizon_runs,
        mean_profit,
        std_dev_profit: variance.sqrt(),
        min_profit: profits.iter().copied().reduce(f64::min).unwrap_or(0.0),
        max_profit: profits.iter().copied().reduce(f64::max).unwrap_or(0.0),
        mean_satisfied_ratio: mean(&ratios),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_runs_rejected() {
        assert!(matches!(
            run_replications(&Scenario::default(), 1, 0),
            Err(SimulationError::Config(ConfigError::ZeroReplications))
        ));
    }

    #[test]
    fn test_summary_is_reproducible() {
        let mut scenario = Scenario::default();
        scenario.simulation.horizon = 24.0 * 14.0;

        let a = run_replications(&scenario, 42, 5).unwrap();
        let b = run_replications(&scenario, 42, 5).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.runs, 5);
        assert!(a.min_profit <= a.mean_profit && a.mean_profit <= a.max_profit);
        assert!(a.mean_satisfied_ratio > 0.0 && a.mean_satisfied_ratio <= 1.0);
    }
}
