//! URL collector stage
//!
//! Runs one collection for a (site, project) pair:
//! 1. Truncates the URL list left by the previous run
//! 2. Loads the depth spec
//! 3. Resolves the extractor from the registry
//! 4. Runs the depth traversal, appending terminal batches to the list
//! 5. Records the run in the ledger

use crate::config::{load_depth_spec, ProjectLayout};
use crate::crawler::traversal::{DepthTraversal, TraversalStats};
use crate::output::{CollectionRunRecorder, StatusMessage};
use crate::plugin::PluginRegistry;
use crate::storage::{SqliteLedger, UrlListStore};
use crate::PipelineError;
use std::path::PathBuf;

/// What a finished collector run produced
#[derive(Debug, Clone)]
pub struct CollectSummary {
    pub stats: TraversalStats,
    pub url_list: PathBuf,
    /// Ledger row written for this run; `None` when nothing was collected
    pub ledger_row: Option<u32>,
}

/// Collector stage for one (site, project) pair
pub struct UrlCollector<'a> {
    layout: ProjectLayout,
    registry: &'a PluginRegistry,
}

impl<'a> UrlCollector<'a> {
    pub fn new(layout: ProjectLayout, registry: &'a PluginRegistry) -> Self {
        Self { layout, registry }
    }

    /// Runs the collector
    ///
    /// # Returns
    ///
    /// * `Ok(Some(CollectSummary))` - The traversal ran
    /// * `Ok(None)` - No extractor is registered for this pair
    /// * `Err(PipelineError)` - Anything else went wrong; already reported
    pub async fn run(&self) -> Result<Option<CollectSummary>, PipelineError> {
        let key = self.layout.key();
        StatusMessage::info(format!(
            "Starting script execution of url_collector for {}",
            key
        ))
        .emit();

        let mut store = UrlListStore::new(self.layout.url_list_path());
        store.reset()?;

        match self.execute(&mut store).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                tracing::error!("Collector for {} failed: {}", key, e);
                StatusMessage::error(format!("Unhandled error during execution: {}", e)).emit();
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        store: &mut UrlListStore,
    ) -> Result<Option<CollectSummary>, PipelineError> {
        let key = self.layout.key();

        let spec_path = self.layout.depth_spec_path();
        StatusMessage::info(format!(
            "Loading configuration file: {}",
            spec_path.display()
        ))
        .emit();
        let spec = load_depth_spec(&spec_path)?;
        tracing::debug!(
            "Depth spec has {} seeds and max depth {}",
            spec.seeds().len(),
            spec.max_depth()
        );

        let Some(plugin) = self.registry.extractor(key) else {
            StatusMessage::error(format!(
                "No extractor registered for {} ({})",
                key,
                key.type_name()
            ))
            .emit();
            return Ok(None);
        };

        let traversal = DepthTraversal::new(&spec, plugin.as_ref())?;
        let stats = traversal.run(store).await?;
        StatusMessage::success(format!(
            "Successfully written {} URLs to {}",
            stats.collected,
            store.path().display()
        ))
        .emit();

        let ledger = SqliteLedger::open(&self.layout.ledger_path())?;
        let mut recorder = CollectionRunRecorder::new(ledger);
        let ledger_row = recorder.record(&key.site, &key.project, stats.collected)?;

        Ok(Some(CollectSummary {
            stats,
            url_list: store.path().to_path_buf(),
            ledger_row,
        }))
    }
}
