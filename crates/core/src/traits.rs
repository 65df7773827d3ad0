//! Core trait definitions
//!
//! [`EpochTransaction`] is everything the epoch tracker needs to know about a
//! transaction. Storage, undo/redo logging and validation live elsewhere and
//! are invisible at this seam.

use crate::contract::Timestamp;
use crate::types::{TxnId, TxnRef};
use std::sync::Arc;

/// The tracker's view of a transaction
///
/// Implementations must return the same start timestamp for the whole life
/// of the transaction: the tracker uses it as the key under which the
/// transaction was registered at begin.
pub trait EpochTransaction {
    /// Timestamp assigned when the transaction began
    fn start_ts(&self) -> Timestamp;

    /// Optional transaction id, used only for diagnostics
    fn txn_id(&self) -> Option<TxnId> {
        None
    }
}

impl EpochTransaction for TxnRef {
    fn start_ts(&self) -> Timestamp {
        TxnRef::start_ts(self)
    }

    fn txn_id(&self) -> Option<TxnId> {
        Some(TxnRef::txn_id(self))
    }
}

impl<T: EpochTransaction + ?Sized> EpochTransaction for Arc<T> {
    fn start_ts(&self) -> Timestamp {
        (**self).start_ts()
    }

    fn txn_id(&self) -> Option<TxnId> {
        (**self).txn_id()
    }
}

impl<T: EpochTransaction + ?Sized> EpochTransaction for &T {
    fn start_ts(&self) -> Timestamp {
        (**self).start_ts()
    }

    fn txn_id(&self) -> Option<TxnId> {
        (**self).txn_id()
    }
}
