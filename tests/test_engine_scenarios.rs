//! Integration tests for the event loop
//!
//! Tests cover:
//! - Full and partial shortages
//! - Horizon boundary handling
//! - Empty-horizon initialization
//! - Reproducibility and retention

use std::cell::RefCell;
use std::rc::Rc;

use periodic_inventory_sim::model::history::HistoryRetention;
use periodic_inventory_sim::simulation::observer::{SilentObserver, SimulationObserver};
use periodic_inventory_sim::{
    InventorySimulation, PriceTiers, ProductConfig, Scenario, ScriptedRandom, SeededRandom,
    SimulationConfig, SimulationError, StatisticsError,
};

/// Helper to create a one-product scenario with deterministic demand of 5
fn create_test_scenario(initial_level: u32, reorder_interval: f64) -> Scenario {
    Scenario {
        simulation: SimulationConfig {
            horizon: 10.0,
            reorder_interval,
            ..SimulationConfig::default()
        },
        products: vec![ProductConfig {
            id: "bolts".to_string(),
            initial_level,
            max_level: 10,
            unit_price: 2.0,
            demand_sizes: vec![5],
            demand_probabilities: vec![1.0],
            order_price_tiers: PriceTiers {
                threshold: 600,
                unit_price_below: 1.0,
                unit_price_above: 0.75,
            },
        }],
    }
}

fn create_sim(scenario: Scenario, rng: ScriptedRandom) -> InventorySimulation {
    InventorySimulation::new(scenario, Box::new(rng))
        .unwrap()
        .with_observer(Box::new(SilentObserver))
}

#[test]
fn test_three_arrivals_drain_stock_then_stock_out() {
    let rng = ScriptedRandom::new().with_interarrivals([1.0, 1.0, 1.0]);
    let mut sim = create_sim(create_test_scenario(10, 1000.0), rng);

    let profit = sim.run().unwrap();
    assert_eq!(profit, 20.0);

    let bolts = sim.product("bolts").unwrap();
    assert_eq!(bolts.level(), 0);
    assert_eq!(bolts.history().level.entries(), &[10, 5, 0]);
    assert_eq!(bolts.history().cumulative_benefit.entries(), &[0.0, 10.0, 20.0]);
    assert_eq!(bolts.history().cumulative_lost_revenue, 10.0);
    assert_eq!(bolts.history().stockout_times.entries(), &[3.0]);

    let stats = sim.statistics().unwrap();
    assert_eq!(stats.total_profit, 20.0);
    assert_eq!(stats.satisfied_count, 2);
    assert_eq!(stats.unsatisfied_count, 1);
    assert!((stats.satisfied_ratio - 2.0 / 3.0).abs() < 1e-12);
    assert!((stats.stockout_time_percentage["bolts"] - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.lost_revenue["bolts"], 10.0);
    assert_eq!(stats.orders_placed, 0);
}

#[test]
fn test_partial_shortage_sells_remaining_stock() {
    let rng = ScriptedRandom::new().with_interarrivals([1.0]);
    let mut sim = create_sim(create_test_scenario(3, 1000.0), rng);
    sim.run().unwrap();

    let bolts = sim.product("bolts").unwrap();
    let sold = sim.total_profit();
    let lost = bolts.history().cumulative_lost_revenue;

    assert_eq!(sold, 6.0);
    assert_eq!(lost, 4.0);
    assert_eq!(sold + lost, 5.0 * 2.0);
    assert_eq!(bolts.level(), 0);
    assert_eq!(sim.counters().unsatisfied_count, 1);
}

#[test]
fn test_order_due_exactly_at_horizon_is_never_dispatched() {
    let rng = ScriptedRandom::new()
        .with_interarrivals([2.0])
        .with_lead_times([8.0]);
    let mut sim = create_sim(create_test_scenario(10, 2.0), rng);
    sim.run().unwrap();

    assert_eq!(sim.order_records()[0].delivery_at, 10.0);
    assert_eq!(sim.product("bolts").unwrap().level(), 5);
    assert_eq!(sim.events_processed(), 1);
    assert_eq!(sim.pending_events(), 1);
    assert_eq!(sim.time_points(), &[0.0, 2.0]);
}

#[test]
fn test_arrival_at_horizon_is_not_scheduled() {
    let rng = ScriptedRandom::new().with_interarrivals([4.0, 6.0]);
    let mut sim = create_sim(create_test_scenario(10, 1000.0), rng);
    sim.run().unwrap();

    assert_eq!(sim.events_processed(), 1);
    assert_eq!(sim.pending_events(), 0);
    assert_eq!(sim.clock(), 4.0);
}

#[test]
fn test_first_arrival_at_horizon_aborts() {
    let rng = ScriptedRandom::new().with_interarrivals([10.0]);
    let mut sim = create_sim(create_test_scenario(10, 1000.0), rng);

    match sim.run() {
        Err(SimulationError::EmptyHorizon {
            first_arrival,
            horizon,
        }) => {
            assert_eq!(first_arrival, 10.0);
            assert_eq!(horizon, 10.0);
        }
        other => panic!("expected EmptyHorizon, got {:?}", other),
    }
    assert_eq!(sim.events_processed(), 0);
    assert_eq!(sim.satisfied_ratio(), Err(StatisticsError::NoCustomers));
    assert!(matches!(
        sim.statistics(),
        Err(StatisticsError::NoCustomers)
    ));
}

#[test]
fn test_same_seed_reproduces_run() {
    let run = |seed| {
        let mut sim = InventorySimulation::new(Scenario::default(), Box::new(SeededRandom::new(seed)))
            .unwrap()
            .with_observer(Box::new(SilentObserver));
        sim.run().unwrap();
        sim
    };

    let a = run(2024);
    let b = run(2024);
    assert_eq!(a.statistics().unwrap(), b.statistics().unwrap());
    assert_eq!(a.order_timestamps(), b.order_timestamps());
    assert_eq!(a.time_points(), b.time_points());
}

#[test]
fn test_default_scenario_invariants() {
    let mut sim = InventorySimulation::new(Scenario::default(), Box::new(SeededRandom::new(7)))
        .unwrap()
        .with_observer(Box::new(SilentObserver));
    sim.run().unwrap();

    let horizon = sim.config().horizon;
    let points = sim.time_points();
    assert!(points.windows(2).all(|w| w[0] <= w[1]));
    assert!(points.iter().all(|&t| t < horizon));

    // Weekly reviews over five months.
    let orders = sim.order_timestamps();
    assert!(orders.len() >= 20 && orders.len() <= 21);
    assert!(orders.windows(2).all(|w| w[1] - w[0] >= 168.0));

    for product in sim.products() {
        let levels = product.history().level.entries();
        assert!(levels.windows(2).all(|w| w[0] != w[1]));
    }

    let stats = sim.statistics().unwrap();
    assert!(stats.satisfied_ratio > 0.0 && stats.satisfied_ratio <= 1.0);
    assert_eq!(stats.total_profit, sim.total_profit());
    assert!(stats.total_order_cost > 0.0);
}

#[test]
fn test_decimation_does_not_change_statistics() {
    let run = |retention| {
        let mut scenario = Scenario::default();
        scenario.simulation.retention = retention;
        let mut sim = InventorySimulation::new(scenario, Box::new(SeededRandom::new(31)))
            .unwrap()
            .with_observer(Box::new(SilentObserver));
        sim.run().unwrap();
        sim
    };

    let full = run(HistoryRetention::KeepAll);
    let thin = run(HistoryRetention::Decimate { stride: 10 });

    assert_eq!(full.statistics().unwrap(), thin.statistics().unwrap());
    let full_len = full.product("prod1").unwrap().history().level.len();
    let thin_len = thin.product("prod1").unwrap().history().level.len();
    assert_eq!(thin_len, (full_len + 9) / 10);
}

#[derive(Default)]
struct Tally {
    satisfied: usize,
    stockouts: usize,
    orders_placed: usize,
    orders_received: usize,
    finished: bool,
}

struct RecordingObserver(Rc<RefCell<Tally>>);

impl SimulationObserver for RecordingObserver {
    fn demand_satisfied(&mut self, _time: f64, _product: &str, _demand: u32, _revenue: f64) {
        self.0.borrow_mut().satisfied += 1;
    }

    fn stockout(&mut self, _time: f64, _product: &str, _demand: u32, _lost_revenue: f64) {
        self.0.borrow_mut().stockouts += 1;
    }

    fn order_placed(&mut self, _time: f64, _delivery_time: f64, _cost: f64) {
        self.0.borrow_mut().orders_placed += 1;
    }

    fn order_received(&mut self, _time: f64) {
        self.0.borrow_mut().orders_received += 1;
    }

    fn finished(&mut self, _statistics: &periodic_inventory_sim::Statistics) {
        self.0.borrow_mut().finished = true;
    }
}

#[test]
fn test_observer_sees_every_outcome() {
    let tally = Rc::new(RefCell::new(Tally::default()));
    let rng = ScriptedRandom::new()
        .with_interarrivals([2.0, 1.0, 1.0])
        .with_lead_times([1.0]);
    let mut sim = InventorySimulation::new(create_test_scenario(10, 2.0), Box::new(rng))
        .unwrap()
        .with_observer(Box::new(RecordingObserver(Rc::clone(&tally))));
    sim.run().unwrap();

    let tally = tally.borrow();
    assert_eq!(tally.satisfied as u64, sim.counters().satisfied_count);
    assert_eq!(tally.stockouts as u64, sim.counters().unsatisfied_count);
    assert_eq!(tally.orders_placed, sim.order_records().len());
    assert_eq!(tally.orders_received, 1);
    assert!(tally.finished);
}
