//! Concurrency layer for Strata epoch tracking
//!
//! This crate implements the per-worker side of MVCC garbage collection:
//! - WorkerEpochTracker: active start timestamps and finished transactions
//!   for one worker thread
//! - SpinLatch: the short-held spin lock guarding a tracker
//! - CompletedBatch: finished transactions handed to the garbage collector
//! - EpochCoordinator: aggregation of all trackers into a safe epoch
//! - EpochConfig: `epoch.toml` configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod completed;
pub mod config;
pub mod coordinator;
pub mod latch;
pub mod metrics;
pub mod tracker;

pub use completed::CompletedBatch;
pub use config::{EpochConfig, CONFIG_FILE_NAME};
pub use coordinator::{is_reclaimable, EpochCoordinator};
pub use latch::{RawSpinLatch, SpinLatch, SpinLatchGuard};
pub use metrics::TrackerMetrics;
pub use tracker::WorkerEpochTracker;
