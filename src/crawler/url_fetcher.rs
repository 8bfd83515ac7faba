//! URL fetcher stage
//!
//! Reads the list written by the collector and hands every URL to the
//! (site, project) fetch plugin. Each result is written as JSON to its own
//! file, named by the URL hash, so re-fetching a URL replaces its file.

use crate::config::{load_fetch_args, ProjectLayout};
use crate::output::StatusMessage;
use crate::plugin::PluginRegistry;
use crate::storage::{url_hash, StorageError, UrlListStore};
use crate::PipelineError;
use std::path::PathBuf;

/// What a finished fetch run produced
#[derive(Debug, Clone)]
pub struct FetchSummary {
    /// URLs handed to the plugin
    pub fetched: usize,
    /// Results with status 200
    pub succeeded: usize,
    pub output_dir: PathBuf,
}

/// Fetch stage for one (site, project) pair
pub struct UrlFetcher<'a> {
    layout: ProjectLayout,
    registry: &'a PluginRegistry,
}

impl<'a> UrlFetcher<'a> {
    pub fn new(layout: ProjectLayout, registry: &'a PluginRegistry) -> Self {
        Self { layout, registry }
    }

    /// Path of the output file for `url`
    pub fn output_path(&self, url: &str) -> PathBuf {
        self.layout.fetcher_output_dir().join(url_hash(url))
    }

    /// Runs the fetcher
    ///
    /// # Returns
    ///
    /// * `Ok(Some(FetchSummary))` - Every listed URL was handed to the plugin
    /// * `Ok(None)` - No fetcher is registered for this pair
    /// * `Err(PipelineError::UrlListMissing)` - The collector has not run
    /// * `Err(PipelineError)` - Reading args or writing output failed
    pub async fn run(&self) -> Result<Option<FetchSummary>, PipelineError> {
        let key = self.layout.key();
        let store = UrlListStore::new(self.layout.url_list_path());

        let urls = match store.read() {
            Ok(urls) => urls,
            Err(StorageError::UrlListNotFound(path)) => {
                StatusMessage::error(format!(
                    "File not found: {} (project {}, site {})",
                    path.display(),
                    key.project,
                    key.site
                ))
                .emit();
                return Err(PipelineError::UrlListMissing { path });
            }
            Err(e) => return Err(e.into()),
        };
        tracing::info!("Fetching {} URLs for {}", urls.len(), key);

        let args = load_fetch_args(&self.layout.fetch_args_path())?;

        let Some(plugin) = self.registry.fetcher(key) else {
            StatusMessage::error(format!(
                "No fetcher registered for {} ({})",
                key,
                key.type_name()
            ))
            .emit();
            return Ok(None);
        };

        let output_dir = self.layout.fetcher_output_dir();
        std::fs::create_dir_all(&output_dir)?;

        let mut succeeded = 0;
        for url in &urls {
            let result = plugin.get_page_content(url, &args).await;
            if result.is_success() {
                succeeded += 1;
            } else {
                tracing::debug!("{} returned status {:?}", url, result.status_code);
            }

            let json = serde_json::to_string_pretty(&result).map_err(|source| {
                PipelineError::Serialize {
                    url: url.clone(),
                    source,
                }
            })?;
            std::fs::write(self.output_path(url), json)?;
        }

        StatusMessage::success(format!(
            "Fetched {} URLs ({} with status 200) into {}",
            urls.len(),
            succeeded,
            output_dir.display()
        ))
        .emit();

        Ok(Some(FetchSummary {
            fetched: urls.len(),
            succeeded,
            output_dir,
        }))
    }
}
