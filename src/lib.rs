//! Nexus-Search: a multi-source dork search aggregation engine
//!
//! Fans a single query out to a paid, paginated search API and a free
//! scraping backend, then merges the two URL streams into one deduplicated,
//! ordered list bounded by the requested count.

pub mod backends;
pub mod config;
pub mod network;
pub mod quota;
pub mod recorder;
pub mod results;
pub mod search;

pub use config::Settings;
pub use recorder::RunRecorder;
pub use search::{AggregationResult, Aggregator};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum result count a caller may request
pub const MAX_RESULTS: usize = 200;

/// Name of the primary (paid API) backend
pub const PRIMARY_BACKEND: &str = "serpapi";

/// Name of the secondary (free scraping) backend
pub const SECONDARY_BACKEND: &str = "duckduckgo";
