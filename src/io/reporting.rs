// src/io/reporting.rs

use std::error::Error;
use std::path::Path;

use serde::Serialize;

use crate::simulation::engine::{InventorySimulation, OrderRecord};

/// One retained entry of a product's level step function.
#[derive(Debug, Clone, Serialize)]
pub struct LevelRecord<'a> {
    pub product: &'a str,
    pub step: usize,
    pub level: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimePointRecord {
    pub step: usize,
    pub time: f64,
}

fn write_records<S: Serialize>(
    path: &Path,
    records: impl IntoIterator<Item = S>,
) -> Result<usize, Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut rows = 0;
    for record in records {
        wtr.serialize(record)?;
        rows += 1;
    }
    wtr.flush()?;
    Ok(rows)
}

/// Writes `levels.csv`, `time_points.csv` and `orders.csv` into `dir`.
///
/// With a `time_limit`, time points and orders after it are left out. Level
/// entries carry no timestamp and are always written in full.
pub fn write_traces(
    dir: &Path,
    sim: &InventorySimulation,
    time_limit: Option<f64>,
) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;
    let within = |t: f64| time_limit.map_or(true, |limit| t <= limit);

    let levels = sim.products().iter().flat_map(|product| {
        product
            .history()
            .level
            .entries()
            .iter()
            .enumerate()
            .map(move |(step, &level)| LevelRecord {
                product: &product.id,
                step,
                level,
            })
    });
    let rows = write_records(&dir.join("levels.csv"), levels)?;
    log::info!("exported {} level rows to {}", rows, dir.display());

    let time_points = sim
        .time_points()
        .iter()
        .enumerate()
        .filter(|&(_, &time)| within(time))
        .map(|(step, &time)| TimePointRecord { step, time });
    write_records(&dir.join("time_points.csv"), time_points)?;

    let orders = sim
        .order_records()
        .iter()
        .filter(|order| within(order.placed_at))
        .cloned()
        .collect::<Vec<OrderRecord>>();
    write_records(&dir.join("orders.csv"), orders)?;

    Ok(())
}
