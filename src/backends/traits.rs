//! Backend trait and request/response types

use crate::network::HttpClient;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// A single search backend producing a sequence of hit URLs.
///
/// `fetch` is best-effort by contract: every failure mode is handled inside
/// the backend per its own retry/abort policy, and whatever was accumulated
/// before an abort is returned. A backend never fails the aggregation.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Backend name, recorded as result provenance
    fn name(&self) -> &str;

    /// Fetch up to `count` URLs for the query
    async fn fetch(&self, client: &HttpClient, query: &str, count: usize) -> Vec<String>;
}

/// HTTP request to be made by a backend
#[derive(Debug, Clone)]
pub struct BackendRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters
    pub params: HashMap<String, String>,
    /// Form body data
    pub form: Option<HashMap<String, String>>,
}

impl BackendRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: HashMap::new(),
            params: HashMap::new(),
            form: None,
        }
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            headers: HashMap::new(),
            params: HashMap::new(),
            form: None,
        }
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set form data
    pub fn with_form(mut self, data: HashMap<String, String>) -> Self {
        self.form = Some(data);
        self
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP response from a backend request
#[derive(Debug)]
pub struct BackendResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl BackendResponse {
    /// Parse response body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.text)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Classified failure of a single backend page fetch.
///
/// The retry policy keys off these variants: throttling and transport
/// failures are transient and consume a retry attempt; everything else
/// aborts the backend's contribution immediately.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP 429 from the provider
    #[error("rate limited by provider")]
    Throttled,
    /// HTTP 401; credential errors are not transient
    #[error("authentication rejected by provider")]
    AuthFailed,
    /// Any other unexpected HTTP status
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),
    /// Provider-level error field in an otherwise successful response
    #[error("provider reported error: {0}")]
    Provider(String),
    /// Response body did not parse as the expected shape
    #[error("malformed provider response: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Network failure or request timeout
    #[error("transport error: {0}")]
    Transport(#[from] anyhow::Error),
}

impl FetchError {
    /// Whether this failure may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Throttled | Self::Transport(_))
    }
}
