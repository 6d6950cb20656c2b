//! Analysis modules.
//!
//! Aggregation and ordering of scanned records.

pub mod aggregator;

pub use aggregator::*;
