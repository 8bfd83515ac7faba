//! Depth traversal engine
//!
//! Walks the seed URLs through the levels of a [`DepthSpec`]. URLs at depth
//! `d` are expanded by the rule of depth `d + 1`; whatever the rule of the
//! deepest level returns is the terminal batch and goes to the sink. Every
//! URL's results are expanded independently, so the walk is a tree visited
//! depth-first, and all terminal batches end up in one flat list.
//!
//! A failed extraction for one URL is logged and skipped. Sink errors are
//! not: losing collected URLs silently would make the run's count wrong.

use crate::config::DepthSpec;
use crate::plugin::{invoke, SiteExtractor};
use crate::storage::StorageError;
use crate::PipelineError;

/// Destination for terminal batches
pub trait UrlSink {
    fn append(&mut self, batch: &[String]) -> Result<(), StorageError>;
}

impl UrlSink for Vec<String> {
    fn append(&mut self, batch: &[String]) -> Result<(), StorageError> {
        self.extend_from_slice(batch);
        Ok(())
    }
}

/// Counters accumulated over one traversal
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TraversalStats {
    /// URLs written to the sink
    pub collected: usize,
    /// Plugin calls made
    pub calls: usize,
    /// Plugin calls that failed and were skipped
    pub failed: usize,
}

/// Depth-driven traversal over one spec and one plugin
pub struct DepthTraversal<'a> {
    spec: &'a DepthSpec,
    plugin: &'a dyn SiteExtractor,
}

impl<'a> DepthTraversal<'a> {
    /// Creates a traversal, checking the plugin can serve every rule
    ///
    /// # Returns
    ///
    /// * `Ok(DepthTraversal)` - Every `method_name` in the spec is supported
    /// * `Err(PipelineError::UnsupportedMethod)` - A rule names a method the
    ///   plugin does not implement
    pub fn new(spec: &'a DepthSpec, plugin: &'a dyn SiteExtractor) -> Result<Self, PipelineError> {
        let supported = plugin.supported_methods();

        for (depth, rule) in spec.rules() {
            if !supported.contains(&rule.method) {
                return Err(PipelineError::UnsupportedMethod {
                    plugin: plugin.name().to_string(),
                    method: rule.method,
                    depth,
                });
            }
        }

        Ok(Self { spec, plugin })
    }

    /// Runs the traversal from the spec's seeds
    pub async fn run(&self, sink: &mut dyn UrlSink) -> Result<TraversalStats, PipelineError> {
        let mut stats = TraversalStats::default();
        self.traverse(self.spec.seeds(), 0, sink, &mut stats).await?;

        tracing::info!(
            "Traversal of {} finished: {} URLs collected, {} of {} calls failed",
            self.plugin.name(),
            stats.collected,
            stats.failed,
            stats.calls
        );

        Ok(stats)
    }

    /// Expands `urls`, which sit at `depth`, down to the terminal level
    pub async fn traverse(
        &self,
        urls: &[String],
        depth: usize,
        sink: &mut dyn UrlSink,
        stats: &mut TraversalStats,
    ) -> Result<(), PipelineError> {
        let max_depth = self.spec.max_depth();

        if depth >= max_depth {
            return persist(urls, sink, stats);
        }

        let Some(rule) = self.spec.next_rule(depth) else {
            return Ok(());
        };

        for url in urls {
            stats.calls += 1;

            let batch = match invoke(self.plugin, rule.method, url, self.spec, depth).await {
                Ok(batch) => batch,
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(
                        "{} failed for {} at depth {}: {}",
                        rule.method,
                        url,
                        depth,
                        e
                    );
                    continue;
                }
            };

            tracing::debug!(
                "{} returned {} URLs for {} (depth {})",
                rule.method,
                batch.len(),
                url,
                depth
            );

            if depth + 1 == max_depth {
                persist(&batch, sink, stats)?;
            } else {
                Box::pin(self.traverse(&batch, depth + 1, sink, stats)).await?;
            }
        }

        Ok(())
    }
}

fn persist(
    batch: &[String],
    sink: &mut dyn UrlSink,
    stats: &mut TraversalStats,
) -> Result<(), PipelineError> {
    sink.append(batch)?;
    stats.collected += batch.len();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_depth_spec, DepthRule};
    use crate::plugin::{ExtractError, ExtractionMethod, ExtractionResult};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Plugin answering from a fixed table; URLs missing from the table fail
    #[derive(Default)]
    struct TablePlugin {
        pages: HashMap<String, Vec<String>>,
        calls: Mutex<Vec<(ExtractionMethod, String, usize)>>,
    }

    impl TablePlugin {
        fn with(mut self, url: &str, children: &[&str]) -> Self {
            self.pages.insert(
                url.to_string(),
                children.iter().map(|c| c.to_string()).collect(),
            );
            self
        }

        fn answer(&self, method: ExtractionMethod, url: &str, depth: usize) -> ExtractionResult {
            self.calls
                .lock()
                .unwrap()
                .push((method, url.to_string(), depth));
            self.pages.get(url).cloned().ok_or(ExtractError::Fetch {
                url: url.to_string(),
                status: Some(500),
            })
        }

        fn calls(&self) -> Vec<(ExtractionMethod, String, usize)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SiteExtractor for TablePlugin {
        fn name(&self) -> &str {
            "TablePlugin"
        }

        fn supported_methods(&self) -> &[ExtractionMethod] {
            &[
                ExtractionMethod::ExtractPages,
                ExtractionMethod::ExtractDetails,
                ExtractionMethod::ExtractItems,
            ]
        }

        async fn extract_pages(&self, url: &str, _spec: &DepthSpec, depth: usize) -> ExtractionResult {
            self.answer(ExtractionMethod::ExtractPages, url, depth)
        }

        async fn extract_details(&self, url: &str, _spec: &DepthSpec, depth: usize) -> ExtractionResult {
            self.answer(ExtractionMethod::ExtractDetails, url, depth)
        }

        async fn extract_items(&self, url: &str, _spec: &DepthSpec, depth: usize) -> ExtractionResult {
            self.answer(ExtractionMethod::ExtractItems, url, depth)
        }
    }

    fn spec(seeds: &[&str], methods: &[ExtractionMethod]) -> DepthSpec {
        DepthSpec::new(
            seeds.iter().map(|s| s.to_string()).collect(),
            methods.iter().map(|m| DepthRule::new(*m)).collect(),
        )
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_zero_depth_seeds_are_terminal() {
        let plugin = TablePlugin::default();
        let spec = spec(&["http://a", "http://b"], &[]);
        let mut sink = Vec::new();

        let stats = DepthTraversal::new(&spec, &plugin)
            .unwrap()
            .run(&mut sink)
            .await
            .unwrap();

        assert_eq!(sink, strings(&["http://a", "http://b"]));
        assert_eq!(stats.collected, 2);
        assert_eq!(stats.calls, 0);
        assert!(plugin.calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_level_from_yaml() {
        let spec = parse_depth_spec(
            r#"
depth0:
  seed_url: ["http://a"]
depth1:
  method_name: extract_items
"#,
        )
        .unwrap();
        let plugin = TablePlugin::default().with("http://a", &["http://a/1", "http://a/2"]);
        let mut sink = Vec::new();

        let stats = DepthTraversal::new(&spec, &plugin)
            .unwrap()
            .run(&mut sink)
            .await
            .unwrap();

        assert_eq!(sink, strings(&["http://a/1", "http://a/2"]));
        assert_eq!(stats.collected, 2);
        assert_eq!(
            plugin.calls(),
            vec![(ExtractionMethod::ExtractItems, "http://a".to_string(), 0)]
        );
    }

    #[tokio::test]
    async fn test_each_level_uses_its_own_rule() {
        let plugin = TablePlugin::default()
            .with("http://s", &["http://s?p=1", "http://s?p=2"])
            .with("http://s?p=1", &["http://d/1"])
            .with("http://s?p=2", &["http://d/2"])
            .with("http://d/1", &["http://i/1a", "http://i/1b"])
            .with("http://d/2", &["http://i/2a"]);
        let spec = spec(
            &["http://s"],
            &[
                ExtractionMethod::ExtractPages,
                ExtractionMethod::ExtractDetails,
                ExtractionMethod::ExtractItems,
            ],
        );
        let mut sink = Vec::new();

        let stats = DepthTraversal::new(&spec, &plugin)
            .unwrap()
            .run(&mut sink)
            .await
            .unwrap();

        // Depth-first: everything under page 1 lands before page 2
        assert_eq!(sink, strings(&["http://i/1a", "http://i/1b", "http://i/2a"]));
        assert_eq!(stats.collected, 3);

        let calls = plugin.calls();
        assert_eq!(calls[0], (ExtractionMethod::ExtractPages, "http://s".to_string(), 0));
        assert_eq!(calls[1], (ExtractionMethod::ExtractDetails, "http://s?p=1".to_string(), 1));
        assert_eq!(calls[2], (ExtractionMethod::ExtractItems, "http://d/1".to_string(), 2));
        assert_eq!(calls[3], (ExtractionMethod::ExtractDetails, "http://s?p=2".to_string(), 1));
        assert_eq!(calls[4], (ExtractionMethod::ExtractItems, "http://d/2".to_string(), 2));
    }

    #[tokio::test]
    async fn test_failed_url_does_not_stop_batch() {
        // "http://bad" is not in the table, so its call fails
        let plugin = TablePlugin::default()
            .with("http://s", &["http://ok/1", "http://bad", "http://ok/2"])
            .with("http://ok/1", &["http://i/1"])
            .with("http://ok/2", &["http://i/2", "http://i/3"]);
        let spec = spec(
            &["http://s"],
            &[ExtractionMethod::ExtractDetails, ExtractionMethod::ExtractItems],
        );
        let mut sink = Vec::new();

        let stats = DepthTraversal::new(&spec, &plugin)
            .unwrap()
            .run(&mut sink)
            .await
            .unwrap();

        assert_eq!(sink, strings(&["http://i/1", "http://i/2", "http://i/3"]));
        assert_eq!(stats.collected, 3);
        assert_eq!(stats.calls, 4);
        assert_eq!(stats.failed, 1);
    }

    #[tokio::test]
    async fn test_failed_seed_keeps_sibling_counts() {
        let plugin = TablePlugin::default().with("http://b", &["http://b/1", "http://b/2"]);
        let spec = spec(&["http://a", "http://b"], &[ExtractionMethod::ExtractItems]);
        let mut sink = Vec::new();

        let stats = DepthTraversal::new(&spec, &plugin)
            .unwrap()
            .run(&mut sink)
            .await
            .unwrap();

        assert_eq!(sink, strings(&["http://b/1", "http://b/2"]));
        assert_eq!(stats.collected, 2);
        assert_eq!(stats.failed, 1);
    }

    #[tokio::test]
    async fn test_empty_batches_add_nothing() {
        let plugin = TablePlugin::default().with("http://s", &[]);
        let spec = spec(
            &["http://s"],
            &[ExtractionMethod::ExtractPages, ExtractionMethod::ExtractItems],
        );
        let mut sink = Vec::new();

        let stats = DepthTraversal::new(&spec, &plugin)
            .unwrap()
            .run(&mut sink)
            .await
            .unwrap();

        assert!(sink.is_empty());
        assert_eq!(stats.collected, 0);
        assert_eq!(stats.calls, 1);
    }

    #[tokio::test]
    async fn test_traverse_from_intermediate_depth() {
        let plugin = TablePlugin::default().with("http://d/9", &["http://i/9"]);
        let spec = spec(
            &["http://s"],
            &[ExtractionMethod::ExtractDetails, ExtractionMethod::ExtractItems],
        );
        let traversal = DepthTraversal::new(&spec, &plugin).unwrap();
        let mut sink = Vec::new();
        let mut stats = TraversalStats::default();

        traversal
            .traverse(&strings(&["http://d/9"]), 1, &mut sink, &mut stats)
            .await
            .unwrap();

        assert_eq!(sink, strings(&["http://i/9"]));
        assert_eq!(stats.collected, 1);
    }

    struct ItemsOnly;

    #[async_trait]
    impl SiteExtractor for ItemsOnly {
        fn name(&self) -> &str {
            "ItemsOnly"
        }

        fn supported_methods(&self) -> &[ExtractionMethod] {
            &[ExtractionMethod::ExtractItems]
        }
    }

    #[test]
    fn test_unsupported_method_rejected_up_front() {
        let spec = spec(
            &["http://s"],
            &[ExtractionMethod::ExtractPages, ExtractionMethod::ExtractItems],
        );

        let result = DepthTraversal::new(&spec, &ItemsOnly);
        assert!(matches!(
            result,
            Err(PipelineError::UnsupportedMethod {
                method: ExtractionMethod::ExtractPages,
                depth: 1,
                ..
            })
        ));
    }

    struct FailingSink;

    impl UrlSink for FailingSink {
        fn append(&mut self, _batch: &[String]) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[tokio::test]
    async fn test_sink_errors_propagate() {
        let plugin = TablePlugin::default().with("http://a", &["http://a/1"]);
        let spec = spec(&["http://a"], &[ExtractionMethod::ExtractItems]);

        let result = DepthTraversal::new(&spec, &plugin)
            .unwrap()
            .run(&mut FailingSink)
            .await;

        assert!(matches!(result, Err(PipelineError::Storage(_))));
    }
}
