//! Aggregate module - Calendar group-by summaries

mod grouping;

pub use grouping::{Aggregator, GroupedSummaries};
