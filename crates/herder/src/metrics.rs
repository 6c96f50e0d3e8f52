//! Herder metrics collection.
//!
//! Counters are plain atomics; the backend that scrapes or exports them is
//! supplied by the embedding application through [`MetricsRegistry`]. A
//! registry that hands out counters nobody reads is a valid no-op backend,
//! which is what tests use.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Atomic counter for simple metrics.
///
/// Signed, because histogram-style counters take bulk decrements when
/// entries move between buckets and must not wrap through zero.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicI64,
}

impl Counter {
    /// Create a new counter starting at 0.
    pub fn new() -> Self {
        Self {
            value: AtomicI64::new(0),
        }
    }

    /// Increment the counter by 1.
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the counter by n.
    pub fn add(&self, n: i64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Decrement the counter by n.
    pub fn dec(&self, n: i64) {
        self.value.fetch_sub(n, Ordering::Relaxed);
    }

    /// Set the counter to a specific value.
    pub fn set(&self, n: i64) {
        self.value.store(n, Ordering::Relaxed);
    }

    /// Get the current value.
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Capability for creating named counters.
///
/// The embedding application decides where counters live and how they are
/// exported; components only ask for them by name.
pub trait MetricsRegistry: Send + Sync {
    /// Get or create the counter registered under `name`.
    fn new_counter(&self, name: &str) -> Arc<Counter>;
}

/// A registry that keeps counters in a map, suitable for in-process
/// inspection and for tests.
#[derive(Default)]
pub struct InMemoryMetrics {
    counters: Mutex<HashMap<String, Arc<Counter>>>,
}

impl InMemoryMetrics {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a counter without creating it.
    pub fn counter(&self, name: &str) -> Option<Arc<Counter>> {
        self.counters.lock().get(name).cloned()
    }

    /// Snapshot all counter values.
    pub fn snapshot(&self) -> HashMap<String, i64> {
        self.counters
            .lock()
            .iter()
            .map(|(name, counter)| (name.clone(), counter.get()))
            .collect()
    }
}

impl MetricsRegistry for InMemoryMetrics {
    fn new_counter(&self, name: &str) -> Arc<Counter> {
        self.counters
            .lock()
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}
