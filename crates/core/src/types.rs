//! Core identifier types for epoch tracking
//!
//! This module defines:
//! - WorkerId: Identifier of the worker thread that owns a tracker
//! - TxnId: Identifier of a transaction object, used in diagnostics
//! - TxnRef: Copyable, non-owning handle to a transaction

use crate::contract::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a worker thread
///
/// Fixed when the worker's tracker is created and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerId(u32);

impl WorkerId {
    /// Create a WorkerId from its raw value
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for WorkerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// Identifier of a transaction object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxnId(u64);

impl TxnId {
    /// Create a TxnId from its raw value
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn-{}", self.0)
    }
}

/// Non-owning handle to a transaction
///
/// Carries only what the tracker and the garbage collector need to find the
/// transaction again: its id and its start timestamp. The transaction object
/// itself stays with whoever created it; dropping a `TxnRef` frees nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxnRef {
    txn_id: TxnId,
    start_ts: Timestamp,
}

impl TxnRef {
    /// Create a handle for the transaction `txn_id` that began at `start_ts`
    pub const fn new(txn_id: TxnId, start_ts: Timestamp) -> Self {
        Self { txn_id, start_ts }
    }

    /// Transaction id
    pub const fn txn_id(&self) -> TxnId {
        self.txn_id
    }

    /// Start timestamp
    pub const fn start_ts(&self) -> Timestamp {
        self.start_ts
    }
}

impl fmt::Display for TxnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.txn_id, self.start_ts)
    }
}
