//! Strata epoch tracking
//!
//! Per-worker bookkeeping of active transaction start timestamps, used by the
//! transaction manager to compute the system-wide safe garbage-collection
//! epoch, and a hand-off queue of finished transactions for the collector.
//!
//! # Quick Start
//!
//! ```
//! use strata_epoch::{Timestamp, TxnId, TxnRef, WorkerEpochTracker, WorkerId};
//!
//! let tracker: WorkerEpochTracker = WorkerEpochTracker::new(WorkerId::new(0), true);
//!
//! tracker.begin(Timestamp::new(10));
//! tracker.begin(Timestamp::new(20));
//! assert_eq!(tracker.oldest_active_timestamp(), Some(Timestamp::new(10)));
//!
//! tracker.commit(TxnRef::new(TxnId::new(1), Timestamp::new(10)));
//! assert_eq!(tracker.oldest_active_timestamp(), Some(Timestamp::new(20)));
//!
//! let batch = tracker.drain_completed();
//! assert_eq!(batch.len(), 1);
//! ```
//!
//! # Architecture
//!
//! - `strata-epoch-core`: timestamps, worker ids, transaction handles, errors
//! - `strata-epoch-concurrency`: the tracker, its latch, metrics, config and
//!   the coordinator that aggregates trackers into a safe epoch

pub use strata_epoch_concurrency::*;
pub use strata_epoch_core::*;
