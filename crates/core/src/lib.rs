//! Core types and traits for Strata epoch tracking
//!
//! This crate defines the foundational types used by the epoch tracker:
//! - Timestamp: Logical start time issued by the transaction manager
//! - WorkerId: Identifier of the worker thread that owns a tracker
//! - TxnId / TxnRef: Non-owning transaction handles
//! - EpochTransaction: The tracker's view of a transaction
//! - EpochError: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod error;
pub mod traits;
pub mod types;

pub use contract::Timestamp;
pub use error::{EpochError, EpochResult, FinishAction};
pub use traits::EpochTransaction;
pub use types::{TxnId, TxnRef, WorkerId};
