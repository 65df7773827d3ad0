//! Per-tracker counters
//!
//! # Memory Ordering
//!
//! Every counter uses Relaxed ordering. They are observational only: nothing
//! synchronizes through them and the epoch computation never reads them.

use std::iter::Sum;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters owned by a tracker
#[derive(Debug, Default)]
pub(crate) struct MetricCounters {
    begun: AtomicU64,
    committed: AtomicU64,
    aborted: AtomicU64,
    drained: AtomicU64,
    drain_calls: AtomicU64,
}

impl MetricCounters {
    pub(crate) fn record_begin(&self) {
        self.begun.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_commit(&self) {
        self.committed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_abort(&self) {
        self.aborted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_drain(&self, drained: usize) {
        self.drain_calls.fetch_add(1, Ordering::Relaxed);
        self.drained.fetch_add(drained as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> TrackerMetrics {
        TrackerMetrics {
            total_begun: self.begun.load(Ordering::Relaxed),
            total_committed: self.committed.load(Ordering::Relaxed),
            total_aborted: self.aborted.load(Ordering::Relaxed),
            total_drained: self.drained.load(Ordering::Relaxed),
            drain_calls: self.drain_calls.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of tracker statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerMetrics {
    /// Transactions registered with `begin`
    pub total_begun: u64,
    /// Transactions finished with `commit`
    pub total_committed: u64,
    /// Transactions finished with `abort`
    pub total_aborted: u64,
    /// Transactions handed out by `drain_completed`
    pub total_drained: u64,
    /// Number of `drain_completed` calls, including empty ones
    pub drain_calls: u64,
}

impl TrackerMetrics {
    /// Total transactions that finished (committed + aborted)
    pub fn total_finished(&self) -> u64 {
        self.total_committed + self.total_aborted
    }

    /// Commit rate (committed / begun)
    pub fn commit_rate(&self) -> f64 {
        if self.total_begun > 0 {
            self.total_committed as f64 / self.total_begun as f64
        } else {
            0.0
        }
    }

    /// Abort rate (aborted / begun)
    pub fn abort_rate(&self) -> f64 {
        if self.total_begun > 0 {
            self.total_aborted as f64 / self.total_begun as f64
        } else {
            0.0
        }
    }
}

impl Sum for TrackerMetrics {
    fn sum<I: Iterator<Item = TrackerMetrics>>(iter: I) -> Self {
        iter.fold(TrackerMetrics::default(), |acc, m| TrackerMetrics {
            total_begun: acc.total_begun + m.total_begun,
            total_committed: acc.total_committed + m.total_committed,
            total_aborted: acc.total_aborted + m.total_aborted,
            total_drained: acc.total_drained + m.total_drained,
            drain_calls: acc.drain_calls + m.drain_calls,
        })
    }
}
