//! Epoch coordinator: aggregation of per-worker trackers
//!
//! The transaction manager keeps one [`WorkerEpochTracker`] per worker. The
//! coordinator owns that set and answers the two system-wide questions:
//!
//! - `safe_epoch()`: the minimum over every tracker's oldest active start
//!   timestamp. Each tracker is latched alone and released before the next
//!   one is read, so trackers never wait on each other.
//! - `drain_all()`: every tracker's completed batch, for the collector.
//!
//! Timestamp allocation is not done here. For the aggregate to stay a safe
//! lower bound, the manager must register a new transaction with its tracker
//! before publishing any timestamp larger than the ones it has handed out.

use crate::completed::CompletedBatch;
use crate::config::EpochConfig;
use crate::metrics::TrackerMetrics;
use crate::tracker::WorkerEpochTracker;
use std::collections::BTreeMap;
use std::sync::Arc;
use strata_epoch_core::{EpochError, EpochResult, EpochTransaction, Timestamp, TxnRef, WorkerId};
use tracing::{debug, info};

/// Whether a version whose visibility ended at `end_ts` may be reclaimed
///
/// Only versions that ended strictly before the safe epoch are reclaimable.
/// `None` means no transaction is active anywhere, so nothing bounds
/// reclamation.
pub fn is_reclaimable(end_ts: Timestamp, safe_epoch: Option<Timestamp>) -> bool {
    match safe_epoch {
        Some(epoch) => end_ts < epoch,
        None => true,
    }
}

/// Owner of every worker's epoch tracker
pub struct EpochCoordinator<T = TxnRef> {
    trackers: BTreeMap<WorkerId, Arc<WorkerEpochTracker<T>>>,
}

impl<T: EpochTransaction> EpochCoordinator<T> {
    /// Create one tracker per configured worker, with ids `0..workers`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the config does not validate.
    pub fn new(config: &EpochConfig) -> EpochResult<Self> {
        config.validate()?;
        // validate() guarantees the count fits in u32
        let workers = config.workers as u32;
        let trackers = (0..workers)
            .map(|id| {
                let worker_id = WorkerId::new(id);
                (
                    worker_id,
                    Arc::new(WorkerEpochTracker::from_config(worker_id, config)),
                )
            })
            .collect();

        info!(
            target: "strata::epoch",
            workers = config.workers,
            gc_enabled = config.gc_enabled,
            "Epoch coordinator started"
        );
        Ok(Self { trackers })
    }

    /// Build a coordinator from trackers created elsewhere
    ///
    /// # Errors
    ///
    /// Returns `DuplicateWorker` if two trackers share a worker id.
    pub fn with_trackers<I>(trackers: I) -> EpochResult<Self>
    where
        I: IntoIterator<Item = Arc<WorkerEpochTracker<T>>>,
    {
        let mut map = BTreeMap::new();
        for tracker in trackers {
            let worker_id = tracker.worker_id();
            if map.insert(worker_id, tracker).is_some() {
                return Err(EpochError::DuplicateWorker(worker_id));
            }
        }
        Ok(Self { trackers: map })
    }

    /// Tracker owned by `worker_id`
    ///
    /// # Errors
    ///
    /// Returns `UnknownWorker` if no such worker was registered.
    pub fn tracker(&self, worker_id: WorkerId) -> EpochResult<&Arc<WorkerEpochTracker<T>>> {
        self.trackers
            .get(&worker_id)
            .ok_or(EpochError::UnknownWorker(worker_id))
    }

    /// Registered worker ids, ascending
    pub fn worker_ids(&self) -> impl Iterator<Item = WorkerId> + '_ {
        self.trackers.keys().copied()
    }

    /// Number of trackers
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    /// True when no tracker is registered
    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    /// System-wide safe garbage-collection epoch
    ///
    /// Minimum of every tracker's oldest active start timestamp, or `None`
    /// if no tracker has an active transaction.
    pub fn safe_epoch(&self) -> Option<Timestamp> {
        self.trackers
            .values()
            .filter_map(|tracker| tracker.oldest_active_timestamp())
            .min()
    }

    /// Drain every tracker's completed queue
    ///
    /// Trackers with nothing to hand over are left out of the result.
    pub fn drain_all(&self) -> Vec<(WorkerId, CompletedBatch<T>)> {
        let batches: Vec<_> = self
            .trackers
            .iter()
            .map(|(worker_id, tracker)| (*worker_id, tracker.drain_completed()))
            .filter(|(_, batch)| !batch.is_empty())
            .collect();

        debug!(
            target: "strata::epoch",
            workers = batches.len(),
            txns = batches.iter().map(|(_, b)| b.len()).sum::<usize>(),
            "Drained completed transactions"
        );
        batches
    }

    /// Counters summed over all trackers
    pub fn metrics(&self) -> TrackerMetrics {
        self.trackers.values().map(|t| t.metrics()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_epoch_core::TxnId;

    fn ts(v: u64) -> Timestamp {
        Timestamp::new(v)
    }

    fn txn(v: u64) -> TxnRef {
        TxnRef::new(TxnId::new(v), ts(v))
    }

    fn coordinator(workers: usize) -> EpochCoordinator {
        EpochCoordinator::new(&EpochConfig {
            gc_enabled: true,
            workers,
            completed_capacity: 0,
        })
        .unwrap()
    }

    #[test]
    fn test_new_creates_one_tracker_per_worker() {
        let c = coordinator(3);
        assert_eq!(c.len(), 3);
        assert!(!c.is_empty());
        let ids: Vec<_> = c.worker_ids().collect();
        assert_eq!(ids, vec![WorkerId::new(0), WorkerId::new(1), WorkerId::new(2)]);
        assert!(c.tracker(WorkerId::new(2)).unwrap().gc_enabled());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EpochConfig {
            workers: 0,
            ..Default::default()
        };
        let result: EpochResult<EpochCoordinator> = EpochCoordinator::new(&config);
        assert!(matches!(result, Err(EpochError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_worker() {
        let c = coordinator(1);
        assert!(matches!(
            c.tracker(WorkerId::new(9)),
            Err(EpochError::UnknownWorker(_))
        ));
    }

    #[test]
    fn test_with_trackers_rejects_duplicates() {
        let a: Arc<WorkerEpochTracker> = Arc::new(WorkerEpochTracker::new(WorkerId::new(1), false));
        let b = Arc::new(WorkerEpochTracker::new(WorkerId::new(1), false));
        let result = EpochCoordinator::with_trackers(vec![a, b]);
        assert!(matches!(result, Err(EpochError::DuplicateWorker(_))));
    }

    #[test]
    fn test_with_trackers_shares_trackers() {
        let worker: Arc<WorkerEpochTracker> =
            Arc::new(WorkerEpochTracker::new(WorkerId::new(4), false));
        let c = EpochCoordinator::with_trackers(vec![Arc::clone(&worker)]).unwrap();

        worker.begin(ts(12));
        assert_eq!(c.safe_epoch(), Some(ts(12)));
    }

    #[test]
    fn test_safe_epoch_is_min_over_workers() {
        let c = coordinator(3);
        assert_eq!(c.safe_epoch(), None);

        c.tracker(WorkerId::new(0)).unwrap().begin(ts(30));
        c.tracker(WorkerId::new(1)).unwrap().begin(ts(10));
        c.tracker(WorkerId::new(1)).unwrap().begin(ts(40));
        assert_eq!(c.safe_epoch(), Some(ts(10)));

        c.tracker(WorkerId::new(1)).unwrap().commit(txn(10));
        assert_eq!(c.safe_epoch(), Some(ts(30)));

        c.tracker(WorkerId::new(0)).unwrap().abort(txn(30));
        c.tracker(WorkerId::new(1)).unwrap().commit(txn(40));
        assert_eq!(c.safe_epoch(), None);
    }

    #[test]
    fn test_drain_all_skips_empty_batches() {
        let c = coordinator(3);
        let w0 = c.tracker(WorkerId::new(0)).unwrap();
        let w2 = c.tracker(WorkerId::new(2)).unwrap();
        w0.begin(ts(1));
        w2.begin(ts(2));
        w2.begin(ts(3));
        w0.commit(txn(1));
        w2.abort(txn(2));
        w2.commit(txn(3));

        let drained = c.drain_all();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].0, WorkerId::new(0));
        assert_eq!(drained[0].1.len(), 1);
        assert_eq!(drained[1].0, WorkerId::new(2));
        assert_eq!(drained[1].1.len(), 2);

        assert!(c.drain_all().is_empty());
    }

    #[test]
    fn test_metrics_are_summed() {
        let c = coordinator(2);
        c.tracker(WorkerId::new(0)).unwrap().begin(ts(1));
        c.tracker(WorkerId::new(1)).unwrap().begin(ts(2));
        c.tracker(WorkerId::new(1)).unwrap().commit(txn(2));

        let m = c.metrics();
        assert_eq!(m.total_begun, 2);
        assert_eq!(m.total_committed, 1);
    }

    #[test]
    fn test_is_reclaimable() {
        assert!(is_reclaimable(ts(4), Some(ts(5))));
        assert!(!is_reclaimable(ts(5), Some(ts(5))));
        assert!(!is_reclaimable(ts(6), Some(ts(5))));
        assert!(is_reclaimable(ts(1_000), None));
    }
}
