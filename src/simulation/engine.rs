// src/simulation/engine.rs

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ConfigError, SimulationError, StatisticsError};
use crate::model::history::Trace;
use crate::model::product::Product;
use crate::model::queues::{Event, EventKind, EventQueue, Shipment};
use crate::simulation::config::{Scenario, SimulationConfig};
use crate::simulation::observer::{LogObserver, SimulationObserver};
use crate::simulation::random::RandomSource;
use crate::simulation::statistics::{self, Counters, Statistics};

/// One periodic order as placed with the supplier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub placed_at: f64,
    pub delivery_at: f64,
    pub lead_time: f64,
    pub cost: f64,
}

/// Cost multiplier for a sampled lead time.
///
/// Outside the threshold a late delivery is discounted and an early one
/// surcharged. Within it there is no adjustment.
pub fn penalty_factor(lead_time: f64, mean: f64, threshold: f64, percentage: f64) -> f64 {
    if (lead_time - mean).abs() <= threshold {
        1.0
    } else if lead_time > mean {
        1.0 - percentage
    } else {
        1.0 + percentage
    }
}

/// Discrete-event simulation of a periodic-review, order-up-to policy.
///
/// An instance runs exactly once; build a new one per run.
pub struct InventorySimulation {
    config: SimulationConfig,
    products: Vec<Product>,
    queue: EventQueue,

    // Injected capabilities
    rng: Box<dyn RandomSource>,
    observer: Box<dyn SimulationObserver>,

    clock: f64,
    last_reorder_time: f64,
    last_time_point: f64,
    counters: Counters,

    // Outputs for plotting
    order_timestamps: Vec<f64>,
    order_records: Vec<OrderRecord>,
    time_points: Trace<f64>,

    events_processed: usize,
    started: bool,
}

impl InventorySimulation {
    /// Validates the scenario and builds the product set. Events are only
    /// scheduled once `run` is called.
    pub fn new(scenario: Scenario, rng: Box<dyn RandomSource>) -> Result<Self, ConfigError> {
        scenario.validate()?;
        let Scenario {
            simulation: config,
            products,
        } = scenario;

        let products = products
            .iter()
            .map(|p| Product::new(p, config.retention))
            .collect();
        let mut time_points = Trace::new(config.retention);
        time_points.push(0.0);

        Ok(Self {
            config,
            products,
            queue: EventQueue::new(),
            rng,
            observer: Box::new(LogObserver),
            clock: 0.0,
            last_reorder_time: 0.0,
            last_time_point: 0.0,
            counters: Counters::default(),
            order_timestamps: Vec::new(),
            order_records: Vec::new(),
            time_points,
            events_processed: 0,
            started: false,
        })
    }

    pub fn with_observer(mut self, observer: Box<dyn SimulationObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Runs until the queue drains or the next event would fall at or after
    /// the horizon. Returns the cumulative profit.
    pub fn run(&mut self) -> Result<f64, SimulationError> {
        if self.started {
            return Err(SimulationError::AlreadyStarted);
        }
        self.started = true;
        self.initialize()?;

        while self.queue.peek_min_time() < self.config.horizon {
            let Some(event) = self.queue.pop_min() else {
                break;
            };
            self.process(event);
        }

        if let Ok(stats) = self.statistics() {
            self.observer.finished(&stats);
        }
        Ok(self.counters.cumulative_revenue)
    }

    fn initialize(&mut self) -> Result<(), SimulationError> {
        let first_arrival = self.rng.exponential(self.config.arrival_rate_lambda);
        if first_arrival >= self.config.horizon {
            return Err(SimulationError::EmptyHorizon {
                first_arrival,
                horizon: self.config.horizon,
            });
        }
        self.queue.insert(Event::customer_arrival(first_arrival));
        Ok(())
    }

    fn process(&mut self, event: Event) {
        self.clock = event.time;
        match event.kind {
            EventKind::CustomerArrival => self.handle_customer_arrival(),
            EventKind::OrderArrival(shipment) => self.handle_order_arrival(shipment),
        }
        self.events_processed += 1;

        if self.clock - self.last_reorder_time >= self.config.reorder_interval {
            self.place_periodic_order();
        }
    }

    fn handle_customer_arrival(&mut self) {
        let now = self.clock;
        self.record_time_point(now);

        for product in &mut self.products {
            let demand = product.sample_demand(self.rng.as_mut());
            let level = product.level();

            if demand <= level {
                let revenue = product.sell(demand);
                self.counters.cumulative_revenue += revenue;
                self.counters.satisfied_count += 1;
                self.observer
                    .demand_satisfied(now, &product.id, demand, revenue);
            } else {
                // Sell whatever is left, the remainder is lost.
                if level > 0 {
                    self.counters.cumulative_revenue += product.sell(level);
                }
                let lost = product.record_stockout(demand - level, now);
                self.counters.unsatisfied_count += 1;
                self.observer.stockout(now, &product.id, demand, lost);
            }
        }

        let next_arrival = now + self.rng.exponential(self.config.arrival_rate_lambda);
        if next_arrival < self.config.horizon {
            self.queue.insert(Event::customer_arrival(next_arrival));
        }
    }

    fn handle_order_arrival(&mut self, shipment: Shipment) {
        let now = self.clock;
        for (id, &quantity) in &shipment.quantities {
            match self.products.iter_mut().find(|p| &p.id == id) {
                Some(product) => product.receive_shipment(quantity),
                None => self.observer.unknown_product(now, id),
            }
        }
        self.record_time_point(now);
        self.observer.order_received(now);
    }

    /// Orders every product back up to its maximum in one shipment.
    fn place_periodic_order(&mut self) {
        let now = self.clock;
        let config = &self.config;

        // Level at trigger time times the gap since the last time point.
        let on_hand: u64 = self.products.iter().map(|p| u64::from(p.level())).sum();
        self.counters.holding_cost_accrued +=
            (now - self.last_time_point) * config.holding_cost_rate * on_hand as f64;

        let lead_time = self
            .rng
            .normal(config.lead_time_mean, config.lead_time_stddev);
        let delivery_time = now + lead_time.max(0.0);

        let mut quantities = BTreeMap::new();
        let mut total_cost = config.base_order_cost;
        for product in &self.products {
            let quantity = product.order_up_to_quantity();
            total_cost += quantity as f64 * product.unit_order_price(quantity);
            quantities.insert(product.id.clone(), quantity);
        }
        total_cost *= penalty_factor(
            lead_time,
            config.lead_time_mean,
            config.penalty_threshold_hours,
            config.penalty_percentage,
        );

        self.queue.insert(Event::order_arrival(
            delivery_time,
            Shipment {
                quantities,
                cost: total_cost,
            },
        ));
        self.counters.total_order_cost += total_cost;
        self.last_reorder_time = now;
        self.order_timestamps.push(now);
        self.order_records.push(OrderRecord {
            placed_at: now,
            delivery_at: delivery_time,
            lead_time,
            cost: total_cost,
        });
        self.observer.order_placed(now, delivery_time, total_cost);
    }

    fn record_time_point(&mut self, time: f64) {
        self.time_points.push(time);
        self.last_time_point = time;
    }

    pub fn statistics(&self) -> Result<Statistics, StatisticsError> {
        statistics::collect(&self.counters, &self.products, self.order_records.len())
    }

    pub fn satisfied_ratio(&self) -> Result<f64, StatisticsError> {
        statistics::satisfied_ratio(self.counters.satisfied_count, self.counters.unsatisfied_count)
    }

    pub fn total_profit(&self) -> f64 {
        self.counters.cumulative_revenue
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn order_timestamps(&self) -> &[f64] {
        &self.order_timestamps
    }

    pub fn order_records(&self) -> &[OrderRecord] {
        &self.order_records
    }

    /// Clock values of every customer and order arrival, starting at 0.
    pub fn time_points(&self) -> &[f64] {
        self.time_points.entries()
    }

    pub fn events_processed(&self) -> usize {
        self.events_processed
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }
}
