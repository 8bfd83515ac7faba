//! On-disk layout of a scraping project
//!
//! Every path the pipeline touches is derived from the base directory and
//! the (site, project) pair:
//!
//! ```text
//! <base>/url_collector/<project>/<site>_<project>.yml      depth spec
//! <base>/url_collector/url_collector_count.db              run ledger
//! <base>/url_fetcher/<project>/<site>_<project>.yml        fetch args
//! <base>/scrape_output/collector_output/<project>/<site>_<project>.txt
//! <base>/scrape_output/fetcher_output/<project>/<site>_<project>/<hash>
//! <base>/cache/<hash>.html
//! ```

use crate::config::Config;
use crate::plugin::PluginKey;
use std::path::{Path, PathBuf};

const LEDGER_FILE: &str = "url_collector_count.db";

/// Resolved paths for one (site, project) pair
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    base_dir: PathBuf,
    cache_dir: PathBuf,
    key: PluginKey,
}

impl ProjectLayout {
    pub fn new(base_dir: impl Into<PathBuf>, key: PluginKey) -> Self {
        let base_dir = base_dir.into();
        let cache_dir = base_dir.join("cache");
        Self {
            base_dir,
            cache_dir,
            key,
        }
    }

    pub fn from_config(config: &Config, key: PluginKey) -> Self {
        let mut layout = Self::new(config.paths.base_dir.clone(), key);
        if let Some(cache_dir) = &config.paths.cache_dir {
            layout.cache_dir = cache_dir.clone();
        }
        layout
    }

    pub fn key(&self) -> &PluginKey {
        &self.key
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn depth_spec_path(&self) -> PathBuf {
        self.base_dir
            .join("url_collector")
            .join(&self.key.project)
            .join(format!("{}.yml", self.key))
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.base_dir.join("url_collector").join(LEDGER_FILE)
    }

    pub fn fetch_args_path(&self) -> PathBuf {
        self.base_dir
            .join("url_fetcher")
            .join(&self.key.project)
            .join(format!("{}.yml", self.key))
    }

    pub fn collector_output_dir(&self) -> PathBuf {
        self.base_dir
            .join("scrape_output")
            .join("collector_output")
            .join(&self.key.project)
    }

    pub fn url_list_path(&self) -> PathBuf {
        self.collector_output_dir()
            .join(format!("{}.txt", self.key))
    }

    pub fn fetcher_output_dir(&self) -> PathBuf {
        self.base_dir
            .join("scrape_output")
            .join("fetcher_output")
            .join(&self.key.project)
            .join(self.key.to_string())
    }
}
