//! Periodic-review, order-up-to inventory simulation.
//!
//! A discrete-event engine drives customer arrivals and supplier deliveries
//! for a small catalog of independently demanded products, reordering every
//! product back to capacity on a fixed cadence.

pub mod error;
pub mod io;
pub mod model;
pub mod simulation;

pub use error::{ConfigError, SimulationError, StatisticsError};
pub use model::product::{PriceTiers, Product, ProductId};
pub use model::queues::{Event, EventKind, EventQueue, Shipment};
pub use simulation::config::{ProductConfig, Scenario, SimulationConfig};
pub use simulation::engine::{penalty_factor, InventorySimulation, OrderRecord};
pub use simulation::random::{RandomSource, ScriptedRandom, SeededRandom};
pub use simulation::statistics::Statistics;
