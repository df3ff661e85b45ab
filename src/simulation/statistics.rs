// src/simulation/statistics.rs

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::StatisticsError;
use crate::model::product::{Product, ProductId};

/// Summary of a finished (or in-progress) run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// Cumulative sales revenue. Order and holding costs are reported
    /// separately and not deducted.
    pub total_profit: f64,
    pub satisfied_ratio: f64,
    /// Per product, the share of level-trace entries at zero, in percent.
    pub stockout_time_percentage: BTreeMap<ProductId, f64>,
    pub satisfied_count: u64,
    pub unsatisfied_count: u64,
    pub holding_cost: f64,
    pub total_order_cost: f64,
    pub orders_placed: usize,
    pub lost_revenue: BTreeMap<ProductId, f64>,
}

/// Counters the engine accumulates while running.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Counters {
    pub cumulative_revenue: f64,
    pub satisfied_count: u64,
    pub unsatisfied_count: u64,
    pub holding_cost_accrued: f64,
    pub total_order_cost: f64,
}

/// `satisfied / (satisfied + unsatisfied)`, undefined without customers.
pub fn satisfied_ratio(satisfied: u64, unsatisfied: u64) -> Result<f64, StatisticsError> {
    let total = satisfied + unsatisfied;
    if total == 0 {
        return Err(StatisticsError::NoCustomers);
    }
    Ok(satisfied as f64 / total as f64)
}

pub fn collect(
    counters: &Counters,
    products: &[Product],
    orders_placed: usize,
) -> Result<Statistics, StatisticsError> {
    let satisfied_ratio = satisfied_ratio(counters.satisfied_count, counters.unsatisfied_count)?;

    let stockout_time_percentage = products
        .iter()
        .map(|p| (p.id.clone(), p.stockout_percentage()))
        .collect();
    let lost_revenue = products
        .iter()
        .map(|p| (p.id.clone(), p.history().cumulative_lost_revenue))
        .collect();

    Ok(Statistics {
        total_profit: counters.cumulative_revenue,
        satisfied_ratio,
        stockout_time_percentage,
        satisfied_count: counters.satisfied_count,
        unsatisfied_count: counters.unsatisfied_count,
        holding_cost: counters.holding_cost_accrued,
        total_order_cost: counters.total_order_cost,
        orders_placed,
        lost_revenue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_without_customers_is_undefined() {
        assert_eq!(satisfied_ratio(0, 0), Err(StatisticsError::NoCustomers));
    }

    #[test]
    fn test_ratio() {
        assert_eq!(satisfied_ratio(3, 1), Ok(0.75));
        assert_eq!(satisfied_ratio(0, 4), Ok(0.0));
    }

    #[test]
    fn test_collect_reports_revenue_as_profit() {
        let counters = Counters {
            cumulative_revenue: 120.0,
            satisfied_count: 9,
            unsatisfied_count: 1,
            holding_cost_accrued: 0.0,
            total_order_cost: 900.0,
        };
        let stats = collect(&counters, &[], 2).unwrap();
        assert_eq!(stats.total_profit, 120.0);
        assert_eq!(stats.total_order_cost, 900.0);
        assert_eq!(stats.satisfied_ratio, 0.9);
        assert_eq!(stats.orders_placed, 2);
        assert!(stats.stockout_time_percentage.is_empty());
    }
}
