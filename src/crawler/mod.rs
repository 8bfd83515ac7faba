//! Crawler module for the two pipeline stages
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with a content-addressed page cache
//! - HTML parsing and path queries
//! - The depth traversal that drives URL collection
//! - The collector and fetcher stages built on top of them

mod collector;
mod fetcher;
mod parser;
mod traversal;
mod url_fetcher;

pub use collector::{CollectSummary, UrlCollector};
pub use fetcher::{build_header_map, build_http_client, FetchResult, PageFetchClient};
pub use parser::{
    extract_all, extract_first, parse_document, parse_tree, select_values, MatchCount,
    PathQuery, Projection, QueryError, PARSED_MESSAGE,
};
pub use traversal::{DepthTraversal, TraversalStats, UrlSink};
pub use url_fetcher::{FetchSummary, UrlFetcher};

use crate::config::ProjectLayout;
use crate::plugin::PluginRegistry;
use crate::PipelineError;

/// Runs the collector stage for the pair described by `layout`
///
/// # Example
///
/// ```no_run
/// use sdf_pipeline::config::ProjectLayout;
/// use sdf_pipeline::crawler::collect;
/// use sdf_pipeline::plugin::{PluginKey, PluginRegistry};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let layout = ProjectLayout::new(".", PluginKey::new("books", "catalog"));
/// let registry = PluginRegistry::new();
/// collect(layout, &registry).await?;
/// # Ok(())
/// # }
/// ```
pub async fn collect(
    layout: ProjectLayout,
    registry: &PluginRegistry,
) -> Result<Option<CollectSummary>, PipelineError> {
    UrlCollector::new(layout, registry).run().await
}

/// Runs the fetcher stage for the pair described by `layout`
pub async fn fetch(
    layout: ProjectLayout,
    registry: &PluginRegistry,
) -> Result<Option<FetchSummary>, PipelineError> {
    UrlFetcher::new(layout, registry).run().await
}
