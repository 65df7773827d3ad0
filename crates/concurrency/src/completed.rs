//! Batch of finished transactions handed to the garbage collector

use strata_epoch_core::{EpochTransaction, Timestamp};

/// Transactions that finished on one worker between two drains
///
/// Returned by [`WorkerEpochTracker::drain_completed`](crate::WorkerEpochTracker::drain_completed).
/// Each finished transaction appears in exactly one batch. Entries are in
/// completion order, but consumers must not depend on that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedBatch<T> {
    txns: Vec<T>,
}

impl<T> CompletedBatch<T> {
    pub(crate) fn from_vec(txns: Vec<T>) -> Self {
        Self { txns }
    }

    /// Number of transactions in the batch
    pub fn len(&self) -> usize {
        self.txns.len()
    }

    /// True when nothing finished since the previous drain
    pub fn is_empty(&self) -> bool {
        self.txns.is_empty()
    }

    /// Iterate over the transactions
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.txns.iter()
    }

    /// Take the transactions out of the batch
    pub fn into_vec(self) -> Vec<T> {
        self.txns
    }
}

impl<T: EpochTransaction> CompletedBatch<T> {
    /// Start timestamps of the batched transactions, in batch order
    pub fn start_timestamps(&self) -> Vec<Timestamp> {
        self.txns.iter().map(EpochTransaction::start_ts).collect()
    }
}

impl<T> Default for CompletedBatch<T> {
    fn default() -> Self {
        Self { txns: Vec::new() }
    }
}

impl<T> IntoIterator for CompletedBatch<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.txns.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a CompletedBatch<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.txns.iter()
    }
}
