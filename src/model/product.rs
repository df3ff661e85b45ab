// src/model/product.rs

use serde::{Deserialize, Serialize};

use crate::model::history::{HistoryRetention, Trace};
use crate::simulation::config::ProductConfig;
use crate::simulation::random::RandomSource;

pub type ProductId = String;

/// Supplier unit price, discounted for orders above a quantity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceTiers {
    pub threshold: i64,
    pub unit_price_below: f64,
    pub unit_price_above: f64,
}

impl PriceTiers {
    /// `unit_price_above` iff `quantity > threshold`.
    pub fn unit_price_for(&self, quantity: i64) -> f64 {
        if quantity > self.threshold {
            self.unit_price_above
        } else {
            self.unit_price_below
        }
    }
}

/// Everything recorded about a product over one run.
#[derive(Debug, Clone)]
pub struct ProductHistory {
    /// Step function: a new entry only when the level actually changes.
    pub level: Trace<u32>,
    /// Revenue of each individual sale.
    pub benefit: Trace<f64>,
    pub cumulative_benefit: Trace<f64>,
    /// Running total of lost revenue, one entry per stockout.
    pub lost_sales: Trace<f64>,
    pub stockout_times: Trace<f64>,
    pub cumulative_lost_revenue: f64,
}

impl ProductHistory {
    fn new(initial_level: u32, retention: HistoryRetention) -> Self {
        let mut level = Trace::new(retention);
        level.push(initial_level);
        let mut cumulative_benefit = Trace::new(retention);
        cumulative_benefit.push(0.0);

        Self {
            level,
            benefit: Trace::new(retention),
            cumulative_benefit,
            lost_sales: Trace::new(retention),
            stockout_times: Trace::new(retention),
            cumulative_lost_revenue: 0.0,
        }
    }
}

/// The state of a single SKU in the warehouse.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    level: u32,
    pub max_level: u32,
    pub unit_price: f64,
    pub demand_sizes: Vec<u32>,
    pub demand_probabilities: Vec<f64>,
    pub order_price_tiers: PriceTiers,
    history: ProductHistory,

    // Running totals over every level-trace entry, independent of retention.
    level_entries: usize,
    zero_level_entries: usize,
    total_benefit: f64,
}

impl Product {
    /// Builds a product from an already validated configuration.
    pub fn new(config: &ProductConfig, retention: HistoryRetention) -> Self {
        Self {
            id: config.id.clone(),
            level: config.initial_level,
            max_level: config.max_level,
            unit_price: config.unit_price,
            demand_sizes: config.demand_sizes.clone(),
            demand_probabilities: config.demand_probabilities.clone(),
            order_price_tiers: config.order_price_tiers,
            history: ProductHistory::new(config.initial_level, retention),
            level_entries: 1,
            zero_level_entries: usize::from(config.initial_level == 0),
            total_benefit: 0.0,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn history(&self) -> &ProductHistory {
        &self.history
    }

    /// Quantity that brings the level back up to `max_level`.
    /// Negative when the level already exceeds the maximum.
    pub fn order_up_to_quantity(&self) -> i64 {
        i64::from(self.max_level) - i64::from(self.level)
    }

    pub fn unit_order_price(&self, quantity: i64) -> f64 {
        self.order_price_tiers.unit_price_for(quantity)
    }

    /// Moves the level by `delta`, never below zero.
    pub fn apply_change(&mut self, delta: i64) {
        let new_level = (i64::from(self.level) + delta).clamp(0, i64::from(u32::MAX)) as u32;
        if new_level == self.level {
            return;
        }
        self.level = new_level;
        self.history.level.push(new_level);
        self.level_entries += 1;
        if new_level == 0 {
            self.zero_level_entries += 1;
        }
    }

    /// Draws one demand size from the product's categorical distribution.
    pub fn sample_demand(&self, rng: &mut dyn RandomSource) -> u32 {
        let index = rng.weighted_index(&self.demand_probabilities);
        self.demand_sizes
            .get(index)
            .or_else(|| self.demand_sizes.last())
            .copied()
            .unwrap_or(0)
    }

    /// Removes `units` from stock at full price and returns the revenue.
    pub fn sell(&mut self, units: u32) -> f64 {
        let revenue = f64::from(units) * self.unit_price;
        self.apply_change(-i64::from(units));
        self.total_benefit += revenue;
        self.history.benefit.push(revenue);
        self.history.cumulative_benefit.push(self.total_benefit);
        revenue
    }

    /// Books `unmet` units of demand as lost and returns the lost revenue.
    pub fn record_stockout(&mut self, unmet: u32, time: f64) -> f64 {
        let lost = f64::from(unmet) * self.unit_price;
        self.history.cumulative_lost_revenue += lost;
        self.history
            .lost_sales
            .push(self.history.cumulative_lost_revenue);
        self.history.stockout_times.push(time);
        lost
    }

    pub fn receive_shipment(&mut self, quantity: i64) {
        self.apply_change(quantity);
    }

    /// Share of level-trace entries equal to zero, in percent.
    pub fn stockout_percentage(&self) -> f64 {
        if self.level_entries == 0 {
            return 0.0;
        }
        self.zero_level_entries as f64 / self.level_entries as f64 * 100.0
    }
}
