// src/model/history.rs

use serde::{Deserialize, Serialize};

/// How much of each trace is kept in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum HistoryRetention {
    /// Every appended entry is kept.
    #[default]
    KeepAll,
    /// Only every `stride`-th entry is kept, starting with the first.
    Decimate { stride: usize },
}

impl HistoryRetention {
    fn keeps(&self, index: usize) -> bool {
        match *self {
            HistoryRetention::KeepAll => true,
            HistoryRetention::Decimate { stride } => stride <= 1 || index % stride == 0,
        }
    }
}

/// An append-only series subject to a retention policy.
#[derive(Debug, Clone)]
pub struct Trace<T> {
    entries: Vec<T>,
    appended: usize,
    retention: HistoryRetention,
}

impl<T> Trace<T> {
    pub fn new(retention: HistoryRetention) -> Self {
        Self {
            entries: Vec::new(),
            appended: 0,
            retention,
        }
    }

    pub fn push(&mut self, value: T) {
        if self.retention.keeps(self.appended) {
            self.entries.push(value);
        }
        self.appended += 1;
    }

    /// Retained entries.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Number of entries ever appended, retained or not.
    pub fn appended(&self) -> usize {
        self.appended
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
