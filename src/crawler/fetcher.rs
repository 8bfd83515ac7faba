//! HTTP fetcher implementation
//!
//! This module handles every HTTP request the pipeline makes:
//! - Building the HTTP client from `[http]` settings
//! - Single GET requests with optional extra headers
//! - Caching 200 bodies under a file named by the URL hash
//! - Folding network failures into an empty [`FetchResult`]

use crate::config::HttpConfig;
use crate::output::StatusMessage;
use crate::storage::PageCache;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for connection setup when a request timeout is configured
const MAX_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Outcome of fetching one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    /// Response body; empty unless the server answered 200
    pub page_doc: String,

    /// HTTP status code; `None` when no response was received
    pub status_code: Option<u16>,

    /// The requested URL
    pub url: String,
}

impl FetchResult {
    /// Result for a URL that produced no response
    pub fn empty(url: &str) -> Self {
        Self {
            page_doc: String::new(),
            status_code: None,
            url: url.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == Some(StatusCode::OK.as_u16())
    }
}

/// Builds an HTTP client from the `[http]` configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sdf_pipeline::config::HttpConfig;
/// use sdf_pipeline::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")));

    let mut builder = Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .brotli(true);

    if config.timeout_secs > 0 {
        builder = builder
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(
                config.timeout_secs.min(MAX_CONNECT_TIMEOUT_SECS),
            ));
    }

    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate validation is disabled (accept-invalid-certs = true)");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build()
}

/// Converts `(name, value)` pairs into a header map
///
/// Pairs that are not valid HTTP headers are skipped with a warning.
pub fn build_header_map<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for (name, value) in pairs {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!("Skipping invalid header {:?}: {:?}", name, value),
        }
    }

    headers
}

/// HTTP client that caches successful page bodies
#[derive(Debug, Clone)]
pub struct PageFetchClient {
    client: Client,
    cache: PageCache,
}

impl PageFetchClient {
    pub fn new(config: &HttpConfig, cache: PageCache) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?, cache))
    }

    pub fn with_client(client: Client, cache: PageCache) -> Self {
        Self { client, cache }
    }

    /// Fetches `url` with a single GET request
    ///
    /// | Outcome | Result |
    /// |---------|--------|
    /// | HTTP 200 | body cached, `page_doc` = body, `status_code` = 200 |
    /// | Other status | `page_doc` empty, `status_code` = status, nothing cached |
    /// | Network error | `page_doc` empty, `status_code` = `None` |
    /// | Empty URL | same as network error, no request sent |
    pub async fn fetch(&self, url: &str, headers: Option<&HeaderMap>) -> FetchResult {
        if url.trim().is_empty() {
            tracing::debug!("No URL given, skipping fetch");
            return FetchResult::empty(url);
        }

        let mut request = self.client.get(url);
        if let Some(headers) = headers {
            request = request.headers(headers.clone());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Request to {} failed: {}", url, e);
                return FetchResult::empty(url);
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!("{} answered with status {}", url, status);
            return FetchResult {
                page_doc: String::new(),
                status_code: Some(status.as_u16()),
                url: url.to_string(),
            };
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Failed to read body of {}: {}", url, e);
                return FetchResult::empty(url);
            }
        };

        match self.cache.store(url, &body) {
            Ok(path) => StatusMessage::success(path.display().to_string())
                .with_url(url)
                .emit(),
            Err(e) => {
                tracing::error!("Failed to cache {}: {}", url, e);
                StatusMessage::error(format!("Failed to cache page: {}", e))
                    .with_url(url)
                    .emit();
            }
        }

        FetchResult {
            page_doc: String::from_utf8_lossy(&body).into_owned(),
            status_code: Some(status.as_u16()),
            url: url.to_string(),
        }
    }
}
