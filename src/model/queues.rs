// src/model/queues.rs

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use crate::model::product::ProductId;

/// Goods in transit from the supplier, one combined order for all products.
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    /// Ordered quantity per product. May be zero or negative when a product
    /// was already at (or above) its maximum when the order was placed.
    pub quantities: BTreeMap<ProductId, i64>,
    pub cost: f64,
}

/// The two things that can happen in the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// One customer demanding every product at once.
    CustomerArrival,
    /// A previously placed order reaching the warehouse.
    OrderArrival(Shipment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time: f64,
    pub kind: EventKind,
}

impl Event {
    pub fn customer_arrival(time: f64) -> Self {
        Self {
            time,
            kind: EventKind::CustomerArrival,
        }
    }

    pub fn order_arrival(time: f64, shipment: Shipment) -> Self {
        Self {
            time,
            kind: EventKind::OrderArrival(shipment),
        }
    }
}

// Heap entry. `seq` breaks ties between equal timestamps in insertion order.
#[derive(Debug)]
struct Scheduled {
    seq: u64,
    event: Event,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap yields the earliest (then oldest) entry.
        other
            .event
            .time
            .total_cmp(&self.event.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue of events keyed by time, FIFO among equal times.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules an event. Times are expected to be finite.
    pub fn insert(&mut self, event: Event) {
        debug_assert!(event.time.is_finite(), "event time must be finite");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { seq, event });
    }

    /// Removes the earliest event, or `None` once the queue is drained.
    pub fn pop_min(&mut self) -> Option<Event> {
        self.heap.pop().map(|scheduled| scheduled.event)
    }

    /// Time of the earliest event, `f64::INFINITY` when empty.
    pub fn peek_min_time(&self) -> f64 {
        self.heap
            .peek()
            .map_or(f64::INFINITY, |scheduled| scheduled.event.time)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
