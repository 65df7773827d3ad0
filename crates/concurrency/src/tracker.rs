//! Per-worker transaction epoch tracker
//!
//! Each worker thread owns one [`WorkerEpochTracker`]. It records the start
//! timestamps of transactions that began on the worker and have not finished,
//! and queues finished transactions for the garbage collector.
//!
//! Sharding the active-transaction registry per worker keeps begin and
//! finish off any global lock. The transaction manager pays instead when it
//! computes the safe epoch: one short latch acquisition per worker.
//!
//! ## Protocol
//!
//! ```text
//! begin(ts)            ts enters the active set
//! commit(txn) | abort(txn)
//!                      txn.start_ts() leaves the active set, and txn is
//!                      queued when GC is enabled (one critical section)
//! oldest_active_timestamp()
//!                      min of the active set, or None
//! drain_completed()    swap the queue out for an empty one
//! ```
//!
//! Finishing a transaction whose start timestamp is not active is a protocol
//! violation. The infallible entry points log it and panic; the `try_*`
//! variants return it as [`EpochError`] and leave the tracker unchanged.
//!
//! ## Concurrency
//!
//! All state sits behind one [`SpinLatch`]. The owning worker calls
//! begin/commit/abort; the transaction manager and the collector call
//! `oldest_active_timestamp` and `drain_completed` from other threads.
//!
//! `oldest_active_timestamp` may be stale by the time the caller looks at it,
//! but it is never newer than any start timestamp that was active during the
//! call: it is the minimum of the set at the instant the latch was held.

use crate::completed::CompletedBatch;
use crate::config::EpochConfig;
use crate::latch::SpinLatch;
use crate::metrics::{MetricCounters, TrackerMetrics};
use std::collections::BTreeSet;
use std::fmt;
use strata_epoch_core::{
    EpochError, EpochResult, EpochTransaction, FinishAction, Timestamp, TxnRef, WorkerId,
};
use tracing::{debug, error, trace};

/// State guarded by the tracker's latch
struct TrackerState<T> {
    /// Start timestamps of in-flight transactions
    active: BTreeSet<Timestamp>,
    /// Finished transactions awaiting the next drain, oldest first
    completed: Vec<T>,
}

/// Active-transaction registry and GC hand-off queue for one worker
///
/// `T` is the transaction handle kept in the completed queue. It is
/// non-owning from the tracker's point of view: [`TxnRef`] is a plain copy,
/// and an `Arc` handle keeps the creator as the owner of the transaction.
///
/// # Example
///
/// ```
/// use strata_epoch_concurrency::WorkerEpochTracker;
/// use strata_epoch_core::{Timestamp, TxnId, TxnRef, WorkerId};
///
/// let tracker: WorkerEpochTracker = WorkerEpochTracker::new(WorkerId::new(1), true);
/// tracker.begin(Timestamp::new(5));
/// tracker.abort(TxnRef::new(TxnId::new(1), Timestamp::new(5)));
///
/// assert_eq!(tracker.oldest_active_timestamp(), None);
/// assert_eq!(tracker.drain_completed().len(), 1);
/// ```
pub struct WorkerEpochTracker<T = TxnRef> {
    worker_id: WorkerId,
    gc_enabled: bool,
    completed_capacity: usize,
    state: SpinLatch<TrackerState<T>>,
    metrics: MetricCounters,
}

impl<T: EpochTransaction> WorkerEpochTracker<T> {
    /// Create a tracker for `worker_id`
    ///
    /// # Arguments
    /// * `worker_id` - Worker thread that owns this tracker
    /// * `gc_enabled` - Queue finished transactions for the garbage collector
    pub fn new(worker_id: WorkerId, gc_enabled: bool) -> Self {
        Self::with_capacity(worker_id, gc_enabled, 0)
    }

    /// Create a tracker with GC settings taken from `config`
    pub fn from_config(worker_id: WorkerId, config: &EpochConfig) -> Self {
        Self::with_capacity(worker_id, config.gc_enabled, config.completed_capacity)
    }

    fn with_capacity(worker_id: WorkerId, gc_enabled: bool, completed_capacity: usize) -> Self {
        // A queue that is never appended to needs no reservation
        let completed_capacity = if gc_enabled { completed_capacity } else { 0 };
        Self {
            worker_id,
            gc_enabled,
            completed_capacity,
            state: SpinLatch::new(TrackerState {
                active: BTreeSet::new(),
                completed: Vec::with_capacity(completed_capacity),
            }),
            metrics: MetricCounters::default(),
        }
    }

    /// Worker that owns this tracker
    pub fn worker_id(&self) -> WorkerId {
        self.worker_id
    }

    /// Whether finished transactions are queued for the garbage collector
    pub fn gc_enabled(&self) -> bool {
        self.gc_enabled
    }

    /// Register a transaction that began at `start_ts`
    ///
    /// # Panics
    ///
    /// Panics if `start_ts` is already active on this tracker. Timestamps are
    /// unique by construction upstream, so this is a caller bug.
    pub fn begin(&self, start_ts: Timestamp) {
        if let Err(e) = self.try_begin(start_ts) {
            self.protocol_violation(e);
        }
    }

    /// Register a transaction that began at `start_ts`
    ///
    /// # Errors
    ///
    /// Returns `DuplicateBegin` if `start_ts` is already active. The tracker
    /// is unchanged.
    pub fn try_begin(&self, start_ts: Timestamp) -> EpochResult<()> {
        let inserted = self.state.lock().active.insert(start_ts);
        if !inserted {
            return Err(EpochError::DuplicateBegin {
                worker_id: self.worker_id,
                start_ts,
            });
        }

        self.metrics.record_begin();
        trace!(
            target: "strata::epoch",
            worker_id = %self.worker_id,
            start_ts = %start_ts,
            "Transaction began"
        );
        Ok(())
    }

    /// Remove a committed transaction from the active set
    ///
    /// With GC enabled the handle is queued for the next drain.
    ///
    /// # Panics
    ///
    /// Panics if the transaction's start timestamp is not active here: it
    /// never began on this worker, or it already finished.
    pub fn commit(&self, txn: T) {
        if let Err(e) = self.try_commit(txn) {
            self.protocol_violation(e);
        }
    }

    /// Remove a committed transaction from the active set
    ///
    /// # Errors
    ///
    /// Returns `UnknownTransaction` if the start timestamp is not active. The
    /// tracker is unchanged and the handle is dropped.
    pub fn try_commit(&self, txn: T) -> EpochResult<()> {
        self.finish(txn, FinishAction::Commit)
    }

    /// Remove an aborted transaction from the active set
    ///
    /// Identical to [`commit`](Self::commit) as far as the tracker is
    /// concerned.
    ///
    /// # Panics
    ///
    /// Panics if the transaction's start timestamp is not active here.
    pub fn abort(&self, txn: T) {
        if let Err(e) = self.try_abort(txn) {
            self.protocol_violation(e);
        }
    }

    /// Remove an aborted transaction from the active set
    ///
    /// # Errors
    ///
    /// Returns `UnknownTransaction` if the start timestamp is not active.
    pub fn try_abort(&self, txn: T) -> EpochResult<()> {
        self.finish(txn, FinishAction::Abort)
    }

    fn finish(&self, txn: T, action: FinishAction) -> EpochResult<()> {
        let start_ts = txn.start_ts();
        let txn_id = txn.txn_id();
        {
            let mut state = self.state.lock();
            if !state.active.remove(&start_ts) {
                return Err(EpochError::UnknownTransaction {
                    worker_id: self.worker_id,
                    start_ts,
                    action,
                });
            }
            if self.gc_enabled {
                state.completed.push(txn);
            }
        }

        match action {
            FinishAction::Commit => self.metrics.record_commit(),
            FinishAction::Abort => self.metrics.record_abort(),
        }
        trace!(
            target: "strata::epoch",
            worker_id = %self.worker_id,
            start_ts = %start_ts,
            txn_id = ?txn_id,
            action = %action,
            "Transaction finished"
        );
        Ok(())
    }

    /// Oldest start timestamp still active on this worker
    ///
    /// Returns `None` when no transaction is active. A returned timestamp may
    /// already have finished by the time the caller sees it, but it is never
    /// greater than the start timestamp of any transaction that was active
    /// while this call held the latch.
    pub fn oldest_active_timestamp(&self) -> Option<Timestamp> {
        self.state.lock().active.first().copied()
    }

    /// Take every transaction that finished since the previous drain
    ///
    /// The queue is swapped for an empty one inside a single critical
    /// section: a concurrent commit or abort lands wholly in this batch or
    /// wholly in the next. Always empty when GC is disabled.
    pub fn drain_completed(&self) -> CompletedBatch<T> {
        // Allocate the replacement before taking the latch
        let fresh = Vec::with_capacity(self.completed_capacity);
        let taken = std::mem::replace(&mut self.state.lock().completed, fresh);

        self.metrics.record_drain(taken.len());
        if !taken.is_empty() {
            debug!(
                target: "strata::epoch",
                worker_id = %self.worker_id,
                count = taken.len(),
                "Completed transactions drained"
            );
        }
        CompletedBatch::from_vec(taken)
    }

    /// Number of transactions currently active
    pub fn active_count(&self) -> usize {
        self.state.lock().active.len()
    }

    /// Number of finished transactions waiting for the next drain
    pub fn pending_completed(&self) -> usize {
        self.state.lock().completed.len()
    }

    /// Snapshot of this tracker's counters
    pub fn metrics(&self) -> TrackerMetrics {
        self.metrics.snapshot()
    }

    #[cold]
    #[track_caller]
    fn protocol_violation(&self, err: EpochError) -> ! {
        error!(
            target: "strata::epoch",
            worker_id = %self.worker_id,
            error = %err,
            "Epoch protocol violation"
        );
        panic!("epoch protocol violation: {}", err);
    }
}

impl<T> fmt::Debug for WorkerEpochTracker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerEpochTracker")
            .field("worker_id", &self.worker_id)
            .field("gc_enabled", &self.gc_enabled)
            .finish_non_exhaustive()
    }
}
