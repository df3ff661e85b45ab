// src/simulation/config.rs

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::history::HistoryRetention;
use crate::model::product::{PriceTiers, ProductId};

const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Engine-wide parameters. Times are in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub horizon: f64,
    pub reorder_interval: f64,
    /// Customer arrival rate; interarrival times have mean `1 / rate`.
    pub arrival_rate_lambda: f64,
    pub lead_time_mean: f64,
    pub lead_time_stddev: f64,
    pub holding_cost_rate: f64,
    pub base_order_cost: f64,
    pub penalty_percentage: f64,
    /// Lead-time deviation from the mean beyond which the penalty applies.
    pub penalty_threshold_hours: f64,
    pub retention: HistoryRetention,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: 24.0 * 30.0 * 2.0, // two months
            reorder_interval: 168.0,    // weekly
            arrival_rate_lambda: 1.5,
            lead_time_mean: 48.0,
            lead_time_stddev: 3.5,
            holding_cost_rate: 0.0002,
            base_order_cost: 100.0,
            penalty_percentage: 0.03,
            penalty_threshold_hours: 3.0,
            retention: HistoryRetention::KeepAll,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.horizon > 0.0 && self.horizon.is_finite()) {
            return Err(ConfigError::NonPositiveHorizon(self.horizon));
        }
        if !(self.reorder_interval > 0.0 && self.reorder_interval.is_finite()) {
            return Err(ConfigError::NonPositiveReorderInterval(self.reorder_interval));
        }
        if !(self.arrival_rate_lambda > 0.0 && self.arrival_rate_lambda.is_finite()) {
            return Err(ConfigError::NonPositiveArrivalRate(self.arrival_rate_lambda));
        }
        if !self.lead_time_mean.is_finite() {
            return Err(ConfigError::InvalidLeadTimeMean(self.lead_time_mean));
        }
        if !(self.lead_time_stddev >= 0.0 && self.lead_time_stddev.is_finite()) {
            return Err(ConfigError::InvalidLeadTimeStdDev(self.lead_time_stddev));
        }
        if !(self.holding_cost_rate >= 0.0) {
            return Err(ConfigError::NegativeHoldingCost(self.holding_cost_rate));
        }
        if !(self.base_order_cost >= 0.0) {
            return Err(ConfigError::NegativeBaseOrderCost(self.base_order_cost));
        }
        if !(0.0..=1.0).contains(&self.penalty_percentage) {
            return Err(ConfigError::PenaltyOutOfRange(self.penalty_percentage));
        }
        if !(self.penalty_threshold_hours >= 0.0) {
            return Err(ConfigError::NegativePenaltyThreshold(
                self.penalty_threshold_hours,
            ));
        }
        if let HistoryRetention::Decimate { stride: 0 } = self.retention {
            return Err(ConfigError::ZeroDecimationStride);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductConfig {
    pub id: ProductId,
    pub initial_level: u32,
    pub max_level: u32,
    pub unit_price: f64,
    pub demand_sizes: Vec<u32>,
    pub demand_probabilities: Vec<f64>,
    pub order_price_tiers: PriceTiers,
}

impl ProductConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let product = || self.id.clone();

        if self.demand_sizes.is_empty() {
            return Err(ConfigError::EmptyDemandSizes(product()));
        }
        if self.demand_sizes.len() != self.demand_probabilities.len() {
            return Err(ConfigError::DemandLengthMismatch {
                product: product(),
                sizes: self.demand_sizes.len(),
                probabilities: self.demand_probabilities.len(),
            });
        }
        if let Some(&value) = self
            .demand_probabilities
            .iter()
            .find(|p| !(**p >= 0.0 && p.is_finite()))
        {
            return Err(ConfigError::InvalidProbability {
                product: product(),
                value,
            });
        }
        let sum: f64 = self.demand_probabilities.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ConfigError::ProbabilitiesDoNotSumToOne {
                product: product(),
                sum,
            });
        }
        if self.max_level < self.initial_level {
            return Err(ConfigError::MaxBelowInitial {
                product: product(),
                initial_level: self.initial_level,
                max_level: self.max_level,
            });
        }
        if !(self.unit_price > 0.0 && self.unit_price.is_finite()) {
            return Err(ConfigError::NonPositiveUnitPrice {
                product: product(),
                price: self.unit_price,
            });
        }
        let tiers = &self.order_price_tiers;
        if !(tiers.unit_price_below >= 0.0 && tiers.unit_price_above >= 0.0) {
            return Err(ConfigError::NegativeTierPrice { product: product() });
        }
        Ok(())
    }
}

/// A complete, loadable simulation setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub products: Vec<ProductConfig>,
}

impl Scenario {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        if self.products.is_empty() {
            return Err(ConfigError::NoProducts);
        }
        let mut seen = HashSet::new();
        for product in &self.products {
            if !seen.insert(product.id.as_str()) {
                return Err(ConfigError::DuplicateProduct(product.id.clone()));
            }
            product.validate()?;
        }
        Ok(())
    }

    /// Reads and validates a scenario from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let scenario: Scenario = serde_json::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }
}

impl Default for Scenario {
    /// Five months of two products with weekly reorders.
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                horizon: 24.0 * 30.0 * 5.0,
                ..SimulationConfig::default()
            },
            products: vec![
                ProductConfig {
                    id: "prod1".to_string(),
                    initial_level: 70,
                    max_level: 1000,
                    unit_price: 2.5,
                    demand_sizes: vec![1, 2, 3, 4],
                    demand_probabilities: vec![0.3, 0.4, 0.2, 0.1],
                    order_price_tiers: PriceTiers {
                        threshold: 600,
                        unit_price_below: 1.0,
                        unit_price_above: 0.75,
                    },
                },
                ProductConfig {
                    id: "prod2".to_string(),
                    initial_level: 70,
                    max_level: 1500,
                    unit_price: 3.5,
                    demand_sizes: vec![1, 2, 3, 4],
                    demand_probabilities: vec![0.2, 0.2, 0.4, 0.2],
                    order_price_tiers: PriceTiers {
                        threshold: 800,
                        unit_price_below: 1.5,
                        unit_price_above: 1.25,
                    },
                },
            ],
        }
    }
}
