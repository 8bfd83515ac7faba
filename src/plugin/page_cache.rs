//! Built-in fetcher that downloads each URL through the shared client
//!
//! Fetch args may carry a `headers` mapping of header name to value; every
//! request for the pair sends those headers.

use crate::crawler::{build_header_map, FetchResult, PageFetchClient};
use crate::plugin::traits::{FetchArgs, SiteFetcher};
use async_trait::async_trait;
use reqwest::header::HeaderMap;

const HEADERS_ARG: &str = "headers";

/// Fetcher that stores every 200 body in the page cache
pub struct PageCacheSite {
    name: String,
    client: PageFetchClient,
}

impl PageCacheSite {
    pub fn new(name: String, client: PageFetchClient) -> Self {
        Self { name, client }
    }
}

/// Header map built from the `headers` argument, if present
fn headers_from_args(args: &FetchArgs) -> Option<HeaderMap> {
    let mapping = args.get(HEADERS_ARG)?.as_mapping()?;

    let pairs: Vec<(&str, &str)> = mapping
        .iter()
        .filter_map(|(name, value)| match (name.as_str(), value.as_str()) {
            (Some(name), Some(value)) => Some((name, value)),
            _ => {
                tracing::warn!("Ignoring non-string header entry {:?}", name);
                None
            }
        })
        .collect();

    Some(build_header_map(pairs))
}

#[async_trait]
impl SiteFetcher for PageCacheSite {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_page_content(&self, url: &str, args: &FetchArgs) -> FetchResult {
        let headers = headers_from_args(args);
        self.client.fetch(url, headers.as_ref()).await
    }
}
