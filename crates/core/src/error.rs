//! Error types for epoch tracking
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Two classes matter to callers:
//! - Protocol violations (`UnknownTransaction`, `DuplicateBegin`): the caller
//!   broke the begin/finish pairing. The infallible tracker entry points treat
//!   these as fatal.
//! - Everything else: configuration and routing errors that are returned
//!   normally.
//!
//! Empty results (no active transaction, nothing to drain) are not errors.

use crate::contract::Timestamp;
use crate::types::WorkerId;
use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for epoch operations
pub type EpochResult<T> = std::result::Result<T, EpochError>;

/// How a transaction left the active set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinishAction {
    /// Transaction committed
    Commit,
    /// Transaction aborted
    Abort,
}

impl fmt::Display for FinishAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishAction::Commit => write!(f, "commit"),
            FinishAction::Abort => write!(f, "abort"),
        }
    }
}

/// Error types for epoch tracking
#[derive(Debug, Error)]
pub enum EpochError {
    /// Commit or abort for a start timestamp this tracker is not tracking
    #[error("{action} of transaction with start timestamp {start_ts} not active on {worker_id}")]
    UnknownTransaction {
        /// Tracker that received the call
        worker_id: WorkerId,
        /// Start timestamp that was not found
        start_ts: Timestamp,
        /// Commit or abort
        action: FinishAction,
    },

    /// Begin for a start timestamp already active on this tracker
    #[error("transaction with start timestamp {start_ts} already active on {worker_id}")]
    DuplicateBegin {
        /// Tracker that received the call
        worker_id: WorkerId,
        /// Start timestamp already present
        start_ts: Timestamp,
    },

    /// Worker not owned by the coordinator
    #[error("unknown worker: {0}")]
    UnknownWorker(WorkerId),

    /// Worker registered twice with the coordinator
    #[error("duplicate worker: {0}")]
    DuplicateWorker(WorkerId),

    /// Configuration rejected by validation or parsing
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error (config file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl EpochError {
    /// True for errors caused by breaking the begin/finish protocol
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            EpochError::UnknownTransaction { .. } | EpochError::DuplicateBegin { .. }
        )
    }
}
