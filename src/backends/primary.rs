//! Primary backend: paid, paginated, rate-limited search API
//!
//! Pages through provider results until the requested count is reached, the
//! provider reports an empty page, the retry budget runs out, or a fatal
//! condition aborts the fetch. Partial results are always kept.

use super::retry::RetryPolicy;
use super::traits::{Backend, BackendRequest, FetchError};
use crate::config::PrimarySettings;
use crate::network::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Provider JSON response shape
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    link: Option<String>,
}

/// Paginated API backend client
pub struct PrimaryBackend {
    endpoint: String,
    api_key: String,
    page_size: u32,
    timeout: Duration,
    page_pacing: Duration,
    policy: RetryPolicy,
}

impl PrimaryBackend {
    /// Build from settings; returns None when no API key is configured
    pub fn new(settings: &PrimarySettings) -> Option<Self> {
        let api_key = settings.api_key.clone().filter(|k| !k.is_empty())?;
        Some(Self {
            endpoint: settings.endpoint.clone(),
            api_key,
            page_size: settings.page_size,
            timeout: settings.timeout(),
            page_pacing: Duration::from_secs_f64(settings.page_pacing_secs),
            policy: RetryPolicy::from_settings(settings),
        })
    }

    /// Fetch one page of results starting at the given offset
    async fn fetch_page(
        &self,
        client: &HttpClient,
        query: &str,
        remaining: usize,
        start: usize,
    ) -> Result<Vec<String>, FetchError> {
        let num = (remaining as u32).min(self.page_size);
        let request = BackendRequest::get(&self.endpoint)
            .param("q", query)
            .param("num", num.to_string())
            .param("api_key", &self.api_key)
            .param("engine", "google")
            .param("start", start.to_string())
            .param("gl", "us")
            .param("hl", "en");

        let response = client
            .execute_with_timeout(request, self.timeout)
            .await
            .map_err(FetchError::Transport)?;

        match response.status {
            429 => return Err(FetchError::Throttled),
            401 => return Err(FetchError::AuthFailed),
            200 => {}
            status => return Err(FetchError::HttpStatus(status)),
        }

        let data: ApiResponse = response.json()?;
        if let Some(message) = data.error {
            return Err(FetchError::Provider(message));
        }

        Ok(data
            .organic_results
            .into_iter()
            .filter_map(|r| r.link)
            .collect())
    }
}

#[async_trait]
impl Backend for PrimaryBackend {
    fn name(&self) -> &str {
        crate::PRIMARY_BACKEND
    }

    async fn fetch(&self, client: &HttpClient, query: &str, count: usize) -> Vec<String> {
        let mut results: Vec<String> = Vec::new();
        let mut budget = self.policy.budget();
        // Offset advances by the number of results the provider actually
        // returned, so short pages do not skip hits.
        let mut start = 0usize;

        while results.len() < count {
            match self
                .fetch_page(client, query, count - results.len(), start)
                .await
            {
                Ok(page) => {
                    if page.is_empty() {
                        info!("primary backend exhausted after {} results", results.len());
                        break;
                    }
                    start += page.len();
                    for link in page {
                        if results.len() < count {
                            results.push(link);
                        }
                    }
                    debug!(collected = results.len(), start, "primary page fetched");
                    if results.len() < count && !self.page_pacing.is_zero() {
                        sleep(self.page_pacing).await;
                    }
                }
                Err(err) => match self.policy.cooldown_for(&err) {
                    Some(cooldown) => {
                        if !budget.consume() {
                            warn!("primary backend retry budget exhausted: {}", err);
                            break;
                        }
                        warn!(
                            remaining = budget.remaining(),
                            "primary backend transient failure, cooling down: {}", err
                        );
                        if !cooldown.is_zero() {
                            sleep(cooldown).await;
                        }
                    }
                    None => {
                        warn!("primary backend aborting: {}", err);
                        break;
                    }
                },
            }
        }

        results
    }
}
