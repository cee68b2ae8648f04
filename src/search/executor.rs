//! Search execution and orchestration

use super::models::AggregationResult;
use crate::backends::{Backend, PrimaryBackend, SecondaryBackend};
use crate::config::Settings;
use crate::network::HttpClient;
use crate::quota;
use crate::results;
use anyhow::Result;
use futures::future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Aggregator that fans a query out to the configured backends and merges
/// their URL streams.
///
/// Each call is a fresh, independent run; the aggregator holds no state
/// beyond its clients.
pub struct Aggregator {
    client: HttpClient,
    primary: Option<Arc<dyn Backend>>,
    secondary: Arc<dyn Backend>,
    primary_weight: f64,
}

impl Aggregator {
    /// Create an aggregator with explicit backends
    pub fn new(
        client: HttpClient,
        primary: Option<Arc<dyn Backend>>,
        secondary: Arc<dyn Backend>,
    ) -> Self {
        Self {
            client,
            primary,
            secondary,
            primary_weight: quota::PRIMARY_SHARE,
        }
    }

    /// Set the share of the total routed to the primary backend
    pub fn with_primary_weight(mut self, weight: f64) -> Self {
        self.primary_weight = weight;
        self
    }

    /// Build from settings; the primary backend is present only when an
    /// API key is configured
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = HttpClient::with_settings(&settings.outgoing)?;
        let primary =
            PrimaryBackend::new(&settings.primary).map(|b| Arc::new(b) as Arc<dyn Backend>);
        let secondary = Arc::new(SecondaryBackend::new(&settings.secondary)) as Arc<dyn Backend>;

        if primary.is_none() {
            info!("no primary API key configured, running in secondary-only mode");
        }

        Ok(Self::new(client, primary, secondary).with_primary_weight(settings.primary.weight))
    }

    /// Whether the primary backend is configured
    pub fn primary_configured(&self) -> bool {
        self.primary.is_some()
    }

    /// Execute one aggregation run.
    ///
    /// Never fails: backend-level problems degrade to fewer (or zero) URLs.
    pub async fn aggregate(&self, query: &str, total: usize) -> AggregationResult {
        if total < 1 {
            return AggregationResult::empty();
        }

        let start = Instant::now();
        let split = quota::allocate_weighted(total, self.primary.is_some(), self.primary_weight);
        debug!(
            primary = split.primary,
            secondary = split.secondary,
            "allocated backend quotas"
        );

        let primary_fut = async {
            match &self.primary {
                Some(backend) if split.primary > 0 => {
                    backend.fetch(&self.client, query, split.primary).await
                }
                _ => Vec::new(),
            }
        };
        let secondary_fut = async {
            if split.secondary > 0 {
                self.secondary
                    .fetch(&self.client, query, split.secondary)
                    .await
            } else {
                Vec::new()
            }
        };

        // The fetches are independent and run concurrently, but the merge
        // order is fixed primary-then-secondary regardless of which backend
        // finishes first.
        let (primary_urls, secondary_urls) = future::join(primary_fut, secondary_fut).await;

        let mut sources_used = Vec::new();
        if split.primary > 0 {
            if let Some(backend) = &self.primary {
                sources_used.push(backend.name().to_string());
            }
        }
        if split.secondary > 0 {
            sources_used.push(self.secondary.name().to_string());
        }

        let urls = results::merge_urls(vec![primary_urls, secondary_urls], total);
        let search_time = start.elapsed().as_secs_f64();

        info!(
            query,
            results = urls.len(),
            search_time,
            sources = ?sources_used,
            "aggregation complete"
        );

        AggregationResult {
            urls,
            search_time,
            sources_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::sleep;

    struct FakeBackend {
        name: &'static str,
        urls: Vec<String>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new(name: &'static str, urls: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                name,
                urls: urls.iter().map(|s| s.to_string()).collect(),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn with_delay(name: &'static str, urls: &[&str], delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                name,
                urls: urls.iter().map(|s| s.to_string()).collect(),
                delay,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self, _client: &HttpClient, _query: &str, count: usize) -> Vec<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            self.urls.iter().take(count).cloned().collect()
        }
    }

    fn aggregator(
        primary: Option<Arc<FakeBackend>>,
        secondary: Arc<FakeBackend>,
    ) -> Aggregator {
        Aggregator::new(
            HttpClient::new().unwrap(),
            primary.map(|b| b as Arc<dyn Backend>),
            secondary as Arc<dyn Backend>,
        )
    }

    #[tokio::test]
    async fn test_zero_total_contacts_no_backend() {
        let primary = FakeBackend::new("primary", &["a"]);
        let secondary = FakeBackend::new("secondary", &["b"]);
        let agg = aggregator(Some(primary.clone()), secondary.clone());

        let result = agg.aggregate("site:example.com", 0).await;

        assert!(result.urls.is_empty());
        assert_eq!(result.search_time, 0.0);
        assert!(result.sources_used.is_empty());
        assert_eq!(primary.calls(), 0);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_merge_dedupe_truncate_scenario() {
        // Primary returns 4 raw hits with one duplicate, secondary two more.
        let primary = FakeBackend::new("primary", &["a", "b", "a", "c"]);
        let secondary = FakeBackend::new("secondary", &["d", "e"]);
        let agg = aggregator(Some(primary), secondary);

        let result = agg.aggregate("site:example.com", 5).await;

        assert_eq!(result.urls, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(result.sources_used, vec!["primary", "secondary"]);
    }

    #[tokio::test]
    async fn test_primary_precedes_secondary_despite_slower_fetch() {
        let primary = FakeBackend::with_delay(
            "primary",
            &["p1", "p2", "p3", "p4", "p5", "p6", "p7"],
            Duration::from_millis(50),
        );
        let secondary = FakeBackend::new("secondary", &["s1", "s2", "s3"]);
        let agg = aggregator(Some(primary), secondary);

        let result = agg.aggregate("inurl:admin", 10).await;

        assert_eq!(
            result.urls,
            vec!["p1", "p2", "p3", "p4", "p5", "p6", "p7", "s1", "s2", "s3"]
        );
    }

    #[tokio::test]
    async fn test_secondary_only_mode() {
        let secondary = FakeBackend::new("secondary", &["x", "y"]);
        let agg = aggregator(None, secondary);

        let result = agg.aggregate("inurl:admin", 10).await;

        assert_eq!(result.urls, vec!["x", "y"]);
        assert_eq!(result.sources_used, vec!["secondary"]);
    }

    #[tokio::test]
    async fn test_backend_isolation_secondary_supplies_all() {
        // Primary aborted internally and contributed nothing.
        let primary = FakeBackend::new("primary", &[]);
        let secondary = FakeBackend::new("secondary", &["s1", "s2", "s3"]);
        let agg = aggregator(Some(primary), secondary);

        let result = agg.aggregate("inurl:login", 10).await;

        assert_eq!(result.urls, vec!["s1", "s2", "s3"]);
        assert_eq!(result.sources_used, vec!["primary", "secondary"]);
    }

    #[tokio::test]
    async fn test_both_empty_is_empty_result_not_error() {
        let primary = FakeBackend::new("primary", &[]);
        let secondary = FakeBackend::new("secondary", &[]);
        let agg = aggregator(Some(primary), secondary);

        let result = agg.aggregate("filetype:pdf nothing", 10).await;

        assert!(result.is_empty());
        assert_eq!(result.sources_used, vec!["primary", "secondary"]);
    }

    #[tokio::test]
    async fn test_truncation_bound_holds() {
        let primary = FakeBackend::new("primary", &["a", "b", "c", "d", "e", "f", "g"]);
        let secondary = FakeBackend::new("secondary", &["h", "i", "j"]);
        let agg = aggregator(Some(primary), secondary);

        for total in 1..=8 {
            let result = agg.aggregate("inurl:admin", total).await;
            assert!(result.urls.len() <= total);
        }
    }

    #[tokio::test]
    async fn test_configured_primary_weight_drives_split() {
        // Both fakes hold more URLs than their share so the observed split
        // reflects the quotas actually requested.
        let primary = FakeBackend::new("primary", &["p1", "p2", "p3", "p4", "p5", "p6", "p7"]);
        let secondary = FakeBackend::new("secondary", &["s1", "s2", "s3", "s4", "s5", "s6", "s7"]);
        let agg = aggregator(Some(primary), secondary).with_primary_weight(0.5);

        let result = agg.aggregate("site:example.com", 10).await;

        assert_eq!(
            result.urls,
            vec!["p1", "p2", "p3", "p4", "p5", "s1", "s2", "s3", "s4", "s5"]
        );
    }

    #[tokio::test]
    async fn test_small_total_skips_secondary() {
        // total=1 allocates everything to the configured primary
        let primary = FakeBackend::new("primary", &["a"]);
        let secondary = FakeBackend::new("secondary", &["b"]);
        let agg = aggregator(Some(primary), secondary.clone());

        let result = agg.aggregate("site:example.com", 1).await;

        assert_eq!(result.urls, vec!["a"]);
        assert_eq!(result.sources_used, vec!["primary"]);
        assert_eq!(secondary.calls(), 0);
    }
}
