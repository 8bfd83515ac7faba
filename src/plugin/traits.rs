//! Plugin traits and error types
//!
//! Site-specific logic plugs into the pipeline through two traits:
//! [`SiteExtractor`] for the collector and [`SiteFetcher`] for the fetcher.

use crate::config::DepthSpec;
use crate::crawler::{FetchResult, QueryError};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Ordered URLs produced by one extraction call
pub type UrlBatch = Vec<String>;

/// Opaque arguments handed to a fetch plugin
pub type FetchArgs = BTreeMap<String, serde_yaml::Value>;

/// Outcome of one extraction call for one URL
pub type ExtractionResult = Result<UrlBatch, ExtractError>;

/// Extraction methods a depth rule can name via `method_name`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Pagination: listing pages reachable from a listing page
    ExtractPages,
    /// Detail-page links found on a listing page
    ExtractDetails,
    /// Final item URLs
    ExtractItems,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExtractPages => "extract_pages",
            Self::ExtractDetails => "extract_details",
            Self::ExtractItems => "extract_items",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single extraction call produced no batch
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{method} is not implemented by {plugin}")]
    Unsupported {
        plugin: String,
        method: ExtractionMethod,
    },

    #[error("No rule configured for depth{0}")]
    MissingRule(usize),

    #[error("Rule parameter '{0}' is missing or not a string")]
    MissingParam(String),

    #[error("Fetch of {url} failed (status: {status:?})")]
    Fetch { url: String, status: Option<u16> },

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Collector-side plugin: one method per [`ExtractionMethod`]
///
/// Every method receives the URL being expanded, the full depth spec and the
/// depth of `url`. The rule being applied is `spec.next_rule(depth)`.
/// Methods a site does not need keep the default, which reports
/// [`ExtractError::Unsupported`]; list the implemented ones in
/// [`SiteExtractor::supported_methods`] so the traversal can reject a spec
/// the plugin cannot serve before any request is made.
#[async_trait]
pub trait SiteExtractor: Send + Sync {
    /// Name used in log and status messages
    fn name(&self) -> &str;

    fn supported_methods(&self) -> &[ExtractionMethod];

    async fn extract_pages(&self, url: &str, spec: &DepthSpec, depth: usize) -> ExtractionResult {
        let _ = (url, spec, depth);
        Err(self.unsupported(ExtractionMethod::ExtractPages))
    }

    async fn extract_details(&self, url: &str, spec: &DepthSpec, depth: usize) -> ExtractionResult {
        let _ = (url, spec, depth);
        Err(self.unsupported(ExtractionMethod::ExtractDetails))
    }

    async fn extract_items(&self, url: &str, spec: &DepthSpec, depth: usize) -> ExtractionResult {
        let _ = (url, spec, depth);
        Err(self.unsupported(ExtractionMethod::ExtractItems))
    }

    fn unsupported(&self, method: ExtractionMethod) -> ExtractError {
        ExtractError::Unsupported {
            plugin: self.name().to_string(),
            method,
        }
    }
}

/// Dispatches `method` to the matching plugin method
pub async fn invoke(
    plugin: &dyn SiteExtractor,
    method: ExtractionMethod,
    url: &str,
    spec: &DepthSpec,
    depth: usize,
) -> ExtractionResult {
    match method {
        ExtractionMethod::ExtractPages => plugin.extract_pages(url, spec, depth).await,
        ExtractionMethod::ExtractDetails => plugin.extract_details(url, spec, depth).await,
        ExtractionMethod::ExtractItems => plugin.extract_items(url, spec, depth).await,
    }
}

/// Fetcher-side plugin
#[async_trait]
pub trait SiteFetcher: Send + Sync {
    fn name(&self) -> &str;

    /// Fetches one collected URL. Failures are expressed in the result
    /// (empty `page_doc`, missing status), never as an error.
    async fn get_page_content(&self, url: &str, args: &FetchArgs) -> FetchResult;
}
