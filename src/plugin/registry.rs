//! Plugin registry
//!
//! Maps a (site, project) pair to the extractor and fetcher that serve it.
//! The registry is filled once at startup, either from the `[[site]]`
//! bindings of the pipeline config or by library users registering their
//! own implementations, and then handed to the stages.

use crate::config::{Config, ExtractorKind, FetcherKind};
use crate::crawler::PageFetchClient;
use crate::plugin::link_selector::LinkSelectorSite;
use crate::plugin::page_cache::PageCacheSite;
use crate::plugin::traits::{SiteExtractor, SiteFetcher};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifies the plugin for one site within one project
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginKey {
    pub site: String,
    pub project: String,
}

impl PluginKey {
    pub fn new(site: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            project: project.into(),
        }
    }

    /// CamelCase type name, e.g. `books_catalog` -> `BooksCatalog`
    pub fn type_name(&self) -> String {
        self.to_string()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect::<String>(),
                    None => String::new(),
                }
            })
            .collect()
    }
}

impl fmt::Display for PluginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.site, self.project)
    }
}

/// Registry of site plugins
#[derive(Default, Clone)]
pub struct PluginRegistry {
    extractors: HashMap<PluginKey, Arc<dyn SiteExtractor>>,
    fetchers: HashMap<PluginKey, Arc<dyn SiteFetcher>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from the config's site bindings
    ///
    /// Every built-in plugin shares `client`, so all of them honour the same
    /// HTTP settings and cache directory.
    pub fn from_config(config: &Config, client: &PageFetchClient) -> Self {
        let mut registry = Self::new();

        for binding in &config.sites {
            let key = PluginKey::new(&binding.site, &binding.project);

            if let Some(kind) = binding.extractor {
                let extractor: Arc<dyn SiteExtractor> = match kind {
                    ExtractorKind::LinkSelector => {
                        Arc::new(LinkSelectorSite::new(key.type_name(), client.clone()))
                    }
                };
                registry.register_extractor(key.clone(), extractor);
            }

            if let Some(kind) = binding.fetcher {
                let fetcher: Arc<dyn SiteFetcher> = match kind {
                    FetcherKind::PageCache => {
                        Arc::new(PageCacheSite::new(key.type_name(), client.clone()))
                    }
                };
                registry.register_fetcher(key.clone(), fetcher);
            }
        }

        tracing::debug!(
            "Registered {} extractors and {} fetchers",
            registry.extractors.len(),
            registry.fetchers.len()
        );

        registry
    }

    pub fn register_extractor(&mut self, key: PluginKey, extractor: Arc<dyn SiteExtractor>) {
        if self.extractors.insert(key.clone(), extractor).is_some() {
            tracing::warn!("Replacing extractor registered for {}", key);
        }
    }

    pub fn register_fetcher(&mut self, key: PluginKey, fetcher: Arc<dyn SiteFetcher>) {
        if self.fetchers.insert(key.clone(), fetcher).is_some() {
            tracing::warn!("Replacing fetcher registered for {}", key);
        }
    }

    pub fn extractor(&self, key: &PluginKey) -> Option<Arc<dyn SiteExtractor>> {
        self.extractors.get(key).cloned()
    }

    pub fn fetcher(&self, key: &PluginKey) -> Option<Arc<dyn SiteFetcher>> {
        self.fetchers.get(key).cloned()
    }
}
