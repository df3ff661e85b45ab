// src/simulation/observer.rs

use log::{debug, info, warn};

use crate::simulation::statistics::Statistics;

/// Receives notable moments of a run. Every method defaults to a no-op so
/// implementations only override what they care about.
pub trait SimulationObserver {
    fn demand_satisfied(&mut self, _time: f64, _product: &str, _demand: u32, _revenue: f64) {}

    fn stockout(&mut self, _time: f64, _product: &str, _demand: u32, _lost_revenue: f64) {}

    fn order_placed(&mut self, _time: f64, _delivery_time: f64, _cost: f64) {}

    fn order_received(&mut self, _time: f64) {}

    fn unknown_product(&mut self, _time: f64, _product: &str) {}

    fn finished(&mut self, _statistics: &Statistics) {}
}

/// Forwards everything to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SimulationObserver for LogObserver {
    fn demand_satisfied(&mut self, time: f64, product: &str, demand: u32, revenue: f64) {
        debug!(
            "t={:.2}: satisfied demand of {} units for {} (+{:.2})",
            time, demand, product, revenue
        );
    }

    fn stockout(&mut self, time: f64, product: &str, demand: u32, lost_revenue: f64) {
        info!(
            "t={:.2}: stockout, could not satisfy demand of {} units for {} (lost {:.2})",
            time, demand, product, lost_revenue
        );
    }

    fn order_placed(&mut self, time: f64, delivery_time: f64, cost: f64) {
        info!(
            "t={:.2}: placed periodic order costing {:.2}, arriving at {:.2}",
            time, cost, delivery_time
        );
    }

    fn order_received(&mut self, time: f64) {
        info!("t={:.2}: order arrived", time);
    }

    fn unknown_product(&mut self, time: f64, product: &str) {
        warn!("t={:.2}: shipment names unknown product '{}'", time, product);
    }

    fn finished(&mut self, statistics: &Statistics) {
        info!("final statistics: {:?}", statistics);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl SimulationObserver for SilentObserver {}
