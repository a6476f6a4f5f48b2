//! The core's only observability surface: a pack of monotone counters
//! updated through atomic increments, independent of the graph lock
//! (spec §5). Logging lives one layer up, in `depgraph-transport`,
//! since only the Connection Handler and Server Engine ever log —
//! the Graph Store, codec, and dispatcher are metrics-only.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::graph::{GraphStats, GraphStore};

/// Opaque handle the Command Dispatcher and Server Engine increment
/// through. Cheap to clone (wraps an `Arc` internally via the caller
/// holding one `Metrics` behind an `Arc`); all methods are lock-free.
#[derive(Default)]
pub struct Metrics {
    connections_total: AtomicU64,
    commands_processed_total: AtomicU64,
    errors_total: AtomicU64,
    packages_indexed_total: AtomicU64,
    started_at: Option<Instant>,
}

/// A consistent read of every counter plus the graph gauges, suitable
/// for a `/metrics` text exposition.
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub connections_total: u64,
    pub commands_processed_total: u64,
    pub errors_total: u64,
    pub packages_indexed_total: u64,
    pub indexed_count: usize,
    pub forward_count: usize,
    pub reverse_count: usize,
    pub uptime_seconds: f64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            started_at: Some(Instant::now()),
            ..Self::default()
        }
    }

    pub fn inc_connections(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_commands_processed(&self) {
        self.commands_processed_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_errors(&self) {
        self.errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_packages_indexed(&self) {
        self.packages_indexed_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, graph: &GraphStore) -> MetricsSnapshot {
        let GraphStats {
            indexed_count,
            forward_count,
            reverse_count,
        } = graph.stats();

        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            commands_processed_total: self.commands_processed_total.load(Ordering::Relaxed),
            errors_total: self.errors_total.load(Ordering::Relaxed),
            packages_indexed_total: self.packages_indexed_total.load(Ordering::Relaxed),
            indexed_count,
            forward_count,
            reverse_count,
            uptime_seconds: self
                .started_at
                .map(|t| t.elapsed().as_secs_f64())
                .unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let m = Metrics::new();
        let g = GraphStore::new();
        m.inc_connections();
        m.inc_connections();
        m.inc_commands_processed();
        m.inc_errors();
        let snap = m.snapshot(&g);
        assert_eq!(snap.connections_total, 2);
        assert_eq!(snap.commands_processed_total, 1);
        assert_eq!(snap.errors_total, 1);
        assert_eq!(snap.indexed_count, 0);
    }
}
