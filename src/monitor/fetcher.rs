//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the monitor, including:
//! - Building the HTTP client with the configured user agent
//! - GET requests to a storefront's JSON endpoint
//! - Error classification
//!
//! A fetch never returns an error to the caller. Every failure is logged here
//! and reported as a [`FetchResult`] variant so the cycle can move on to the
//! next target.

use crate::config::HttpConfig;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Got a 2xx response
    Success {
        /// Requested URL
        url: String,
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: String,
    },

    /// The server answered with a non-success status
    ///
    /// The body was still received and is handed to extraction like any
    /// other payload.
    HttpError {
        /// Requested URL
        url: String,
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: String,
    },

    /// Network error (DNS, connection refused, timeout, truncated body)
    NetworkError {
        /// Requested URL
        url: String,
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Response body, present whenever the server answered
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Success { body, .. } | Self::HttpError { body, .. } => Some(body),
            Self::NetworkError { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Retrieves one storefront payload per call
///
/// Implementations must not fail across this boundary: transport problems
/// are reported through [`FetchResult`].
pub trait Fetcher {
    fn fetch(&self, host: &str, path: &str) -> impl Future<Output = FetchResult> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// No request timeout is set unless `request_timeout_secs` is configured.
///
/// # Example
///
/// ```no_run
/// use storefront_watch::config::HttpConfig;
/// use storefront_watch::monitor::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    scheme: String,
}

impl HttpFetcher {
    /// Creates a fetcher that requests `https://{host}{path}`
    pub fn new(client: Client) -> Self {
        Self {
            client,
            scheme: "https".to_string(),
        }
    }

    /// Uses a different URL scheme, e.g. `http` for a local mock server
    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    /// The URL requested for a target
    pub fn endpoint(&self, host: &str, path: &str) -> String {
        format!("{}://{}{}", self.scheme, host, path)
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, host: &str, path: &str) -> FetchResult {
        let url = self.endpoint(host, path);
        fetch_url(&self.client, &url).await
    }
}

/// Issues a single GET request and classifies the outcome
///
/// Only a request that gets no complete response is a
/// [`FetchResult::NetworkError`]; a non-2xx answer keeps its body. There is
/// no retry. Failures are logged at `warn` level.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    tracing::debug!("Fetching {}", url);

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            tracing::warn!("Fetch failed for {}: {}", url, error);
            return FetchResult::NetworkError {
                url: url.to_string(),
                error,
            };
        }
    };

    let status = response.status();
    match response.text().await {
        Ok(body) if status.is_success() => {
            tracing::debug!("Fetched {} bytes from {}", body.len(), url);
            FetchResult::Success {
                url: url.to_string(),
                status_code: status.as_u16(),
                body,
            }
        }
        Ok(body) => {
            tracing::warn!("Fetch for {} returned HTTP {}", url, status.as_u16());
            FetchResult::HttpError {
                url: url.to_string(),
                status_code: status.as_u16(),
                body,
            }
        }
        Err(e) => {
            tracing::warn!("Failed to read body from {}: {}", url, e);
            FetchResult::NetworkError {
                url: url.to_string(),
                error: e.to_string(),
            }
        }
    }
}
