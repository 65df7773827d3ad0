//! Logical transaction timestamp
//!
//! Timestamps are issued by the transaction manager when a transaction
//! begins. They are not wall-clock values: the only property the epoch
//! tracker relies on is the total order, and that no two live transactions
//! share one.
//!
//! ## Usage
//!
//! Never expose raw arithmetic. Use explicit constructors:
//!
//! ```
//! use strata_epoch_core::Timestamp;
//!
//! let start = Timestamp::new(42);
//! assert!(Timestamp::ZERO.is_before(start));
//! assert_eq!(start.as_u64(), 42);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical start timestamp of a transaction
///
/// ## Invariants
///
/// - Timestamps are totally ordered
/// - A timestamp identifies at most one live transaction
/// - `Timestamp::ZERO` orders before every issued timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The smallest representable timestamp
    pub const ZERO: Timestamp = Timestamp(0);

    /// Maximum representable timestamp
    pub const MAX: Timestamp = Timestamp(u64::MAX);

    /// Create a timestamp from its raw logical value
    #[inline]
    pub const fn new(value: u64) -> Self {
        Timestamp(value)
    }

    /// Get the raw logical value
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Check if this timestamp is before another
    #[inline]
    pub fn is_before(&self, other: Timestamp) -> bool {
        self.0 < other.0
    }

    /// Check if this timestamp is after another
    #[inline]
    pub fn is_after(&self, other: Timestamp) -> bool {
        self.0 > other.0
    }
}

impl From<u64> for Timestamp {
    fn from(value: u64) -> Self {
        Timestamp(value)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
