//! Search aggregation module
//!
//! Orchestrates the per-backend fetches and merges their URL streams into
//! a single bounded, deduplicated result.

mod executor;
mod models;

pub use executor::Aggregator;
pub use models::AggregationResult;
