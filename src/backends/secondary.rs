//! Secondary backend: free, session-based HTML scraping
//!
//! Best-effort supplement with no authentication and no retry budget. Any
//! failure is logged and reported as zero results; it never propagates.

use super::traits::{Backend, BackendRequest};
use crate::network::HttpClient;
use anyhow::Result;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error};

use crate::config::SecondarySettings;

/// Session-scraping backend client
pub struct SecondaryBackend {
    endpoint: String,
    timeout: Duration,
    item_pacing: Duration,
}

impl SecondaryBackend {
    pub fn new(settings: &SecondarySettings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            timeout: settings.timeout(),
            item_pacing: Duration::from_secs_f64(settings.item_pacing_secs),
        }
    }

    /// One scraping pass; request state lives only for this call
    async fn scrape(&self, client: &HttpClient, query: &str, count: usize) -> Result<Vec<String>> {
        let mut form = HashMap::new();
        form.insert("q".to_string(), query.to_string());
        form.insert("b".to_string(), String::new());

        let request = BackendRequest::post(&self.endpoint).with_form(form);
        let response = client.execute_with_timeout(request, self.timeout).await?;

        if !response.is_success() {
            anyhow::bail!("HTTP error: {}", response.status);
        }

        let links = Self::parse_result_links(&response.text, count);
        let mut results = Vec::with_capacity(links.len());
        for link in links {
            results.push(link);
            if results.len() < count && !self.item_pacing.is_zero() {
                sleep(self.item_pacing).await;
            }
        }

        Ok(results)
    }

    /// Extract outbound hit links from the provider's result page
    fn parse_result_links(html: &str, count: usize) -> Vec<String> {
        let document = Html::parse_document(html);
        let result_selector = Selector::parse("div.result").unwrap();
        let link_selector = Selector::parse("a.result__a").unwrap();

        let mut links = Vec::new();

        for element in document.select(&result_selector) {
            if links.len() >= count {
                break;
            }

            let href = element
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(|h| h.to_string())
                .unwrap_or_default();

            // Skip provider-internal and non-absolute links
            if href.is_empty() || href.contains("duckduckgo.com") {
                continue;
            }
            if url::Url::parse(&href).is_err() {
                continue;
            }

            links.push(href);
        }

        links
    }
}

#[async_trait]
impl Backend for SecondaryBackend {
    fn name(&self) -> &str {
        crate::SECONDARY_BACKEND
    }

    async fn fetch(&self, client: &HttpClient, query: &str, count: usize) -> Vec<String> {
        match self.scrape(client, query, count).await {
            Ok(urls) => {
                debug!(collected = urls.len(), "secondary backend fetched");
                urls
            }
            Err(e) => {
                error!("secondary backend failed, degrading to zero results: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_settings(endpoint: String) -> SecondarySettings {
        SecondarySettings {
            endpoint,
            item_pacing_secs: 0.0,
            ..Default::default()
        }
    }

    fn result_page() -> &'static str {
        r#"
        <html><body>
          <div class="result">
            <a class="result__a" href="https://one.example/page">One</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://duckduckgo.com/internal">Internal</a>
          </div>
          <div class="result">
            <a class="result__a" href="/relative/link">Relative</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://two.example/page">Two</a>
          </div>
        </body></html>
        "#
    }

    #[test]
    fn test_parse_skips_internal_and_relative_links() {
        let links = SecondaryBackend::parse_result_links(result_page(), 10);
        assert_eq!(
            links,
            vec![
                "https://one.example/page".to_string(),
                "https://two.example/page".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_respects_count() {
        let links = SecondaryBackend::parse_result_links(result_page(), 1);
        assert_eq!(links, vec!["https://one.example/page".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_scrapes_result_page() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(result_page()))
            .mount(&server)
            .await;

        let backend = SecondaryBackend::new(&fast_settings(format!("{}/", server.uri())));
        let client = HttpClient::new().unwrap();
        let urls = backend.fetch(&client, "site:example.com", 10).await;

        assert_eq!(urls.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let backend = SecondaryBackend::new(&fast_settings(format!("{}/", server.uri())));
        let client = HttpClient::new().unwrap();
        let urls = backend.fetch(&client, "site:example.com", 10).await;

        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades_to_empty() {
        let backend = SecondaryBackend::new(&fast_settings(
            "http://127.0.0.1:1/html/".to_string(),
        ));
        let client = HttpClient::new().unwrap();
        let urls = backend.fetch(&client, "site:example.com", 3).await;

        assert!(urls.is_empty());
    }
}
