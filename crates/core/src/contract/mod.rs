//! Contract types shared across the epoch layers
//!
//! - [`Timestamp`]: the logical time that orders transaction starts

pub mod timestamp;

pub use timestamp::Timestamp;
