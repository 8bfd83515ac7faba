//! Built-in extractor driven by depth-rule queries
//!
//! Every rule names a `query` (CSS selector with an optional `/@attr` or
//! `/text()` projection). The extractor fetches the URL, runs the query over
//! the page and resolves every value against the page URL. Only http(s)
//! results are kept, first occurrence wins.

use crate::config::DepthSpec;
use crate::crawler::{parse_tree, select_values, MatchCount, PageFetchClient};
use crate::plugin::traits::{ExtractError, ExtractionMethod, ExtractionResult, SiteExtractor};
use async_trait::async_trait;
use std::collections::HashSet;
use url::Url;

const QUERY_PARAM: &str = "query";

const ALL_METHODS: [ExtractionMethod; 3] = [
    ExtractionMethod::ExtractPages,
    ExtractionMethod::ExtractDetails,
    ExtractionMethod::ExtractItems,
];

/// Extractor that follows links selected by each rule's `query`
pub struct LinkSelectorSite {
    name: String,
    client: PageFetchClient,
}

impl LinkSelectorSite {
    pub fn new(name: String, client: PageFetchClient) -> Self {
        Self { name, client }
    }

    /// Fetches `url` and returns the resolved matches of the rule for `depth`
    async fn select_links(&self, url: &str, spec: &DepthSpec, depth: usize) -> ExtractionResult {
        let rule = spec
            .next_rule(depth)
            .ok_or(ExtractError::MissingRule(depth + 1))?;
        let query = rule
            .param_str(QUERY_PARAM)
            .ok_or_else(|| ExtractError::MissingParam(QUERY_PARAM.to_string()))?;

        let page = self.client.fetch(url, None).await;
        if !page.is_success() {
            return Err(ExtractError::Fetch {
                url: url.to_string(),
                status: page.status_code,
            });
        }

        let base = Url::parse(url).map_err(|e| anyhow::anyhow!("Invalid page URL {}: {}", url, e))?;
        let tree = parse_tree(&page);
        let values = select_values(&tree, query, MatchCount::All)?;

        let links = resolve_links(&base, values);
        tracing::debug!(
            "{} selected {} links from {} with '{}'",
            self.name,
            links.len(),
            url,
            query
        );
        Ok(links)
    }
}

/// Resolves `values` against `base`, keeping unique http(s) URLs in order
fn resolve_links(base: &Url, values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for value in values {
        let Ok(mut resolved) = base.join(value.trim()) else {
            tracing::trace!("Skipping unresolvable link '{}'", value);
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        resolved.set_fragment(None);

        let link = resolved.to_string();
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}

#[async_trait]
impl SiteExtractor for LinkSelectorSite {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_methods(&self) -> &[ExtractionMethod] {
        &ALL_METHODS
    }

    /// The listing page itself followed by every page its query selects
    async fn extract_pages(&self, url: &str, spec: &DepthSpec, depth: usize) -> ExtractionResult {
        let found = self.select_links(url, spec, depth).await?;

        let mut pages = Vec::with_capacity(found.len() + 1);
        pages.push(url.to_string());
        pages.extend(found.into_iter().filter(|link| link != url));
        Ok(pages)
    }

    async fn extract_details(&self, url: &str, spec: &DepthSpec, depth: usize) -> ExtractionResult {
        self.select_links(url, spec, depth).await
    }

    async fn extract_items(&self, url: &str, spec: &DepthSpec, depth: usize) -> ExtractionResult {
        self.select_links(url, spec, depth).await
    }
}
