//! Aggregation result model

use serde::{Deserialize, Serialize};

/// Outcome of one aggregation run.
///
/// Always well-formed: partial or total backend failure shows up as a
/// shorter (possibly empty) `urls` list, never as an error value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Deduplicated hit URLs in source-priority then discovery order
    pub urls: Vec<String>,
    /// Wall-clock seconds spent aggregating
    pub search_time: f64,
    /// Backends invoked with nonzero quota, in invocation order
    pub sources_used: Vec<String>,
}

impl AggregationResult {
    /// The "nothing to do" result for non-positive requested counts
    pub fn empty() -> Self {
        Self {
            urls: Vec::new(),
            search_time: 0.0,
            sources_used: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn result_count(&self) -> usize {
        self.urls.len()
    }
}
