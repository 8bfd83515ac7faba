//! Site plugins
//!
//! This module contains the plugin interface and the pieces around it:
//! - the extractor/fetcher traits and the method tags depth rules refer to
//! - the registry resolving a (site, project) pair to its plugins
//! - built-in plugins that can be bound from the pipeline config

mod link_selector;
mod page_cache;
mod registry;
mod traits;

pub use link_selector::LinkSelectorSite;
pub use page_cache::PageCacheSite;
pub use registry::{PluginKey, PluginRegistry};
pub use traits::{
    invoke, ExtractError, ExtractionMethod, ExtractionResult, FetchArgs, SiteExtractor,
    SiteFetcher, UrlBatch,
};
