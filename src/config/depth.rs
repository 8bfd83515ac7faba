//! Depth specification loading
//!
//! A depth spec is a YAML mapping keyed `depth0`, `depth1`, ... `depthN`.
//! `depth0` holds the seed URLs; every deeper entry names the extraction
//! method that produces the URLs of that depth, plus any site-specific
//! parameters the plugin wants to read.
//!
//! ```yaml
//! depth0:
//!   seed_url: https://books.example/catalog
//! depth1:
//!   method_name: extract_pages
//!   query: "a.next/@href"
//! depth2:
//!   method_name: extract_items
//!   query: "article h3 a/@href"
//! ```

use crate::plugin::ExtractionMethod;
use crate::ConfigError;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

const DEPTH_KEY_PREFIX: &str = "depth";

/// The `seed_url` field accepts a single URL or a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SeedUrls {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct SeedRule {
    seed_url: SeedUrls,
}

/// Extraction rule for one depth level
#[derive(Debug, Clone, Deserialize)]
pub struct DepthRule {
    /// Which plugin method produces the URLs of this depth
    #[serde(rename = "method_name")]
    pub method: ExtractionMethod,

    /// Site-specific parameters, passed through untouched
    #[serde(flatten)]
    pub params: BTreeMap<String, Value>,
}

impl DepthRule {
    pub fn new(method: ExtractionMethod) -> Self {
        Self {
            method,
            params: BTreeMap::new(),
        }
    }

    /// Adds a string parameter (builder style)
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }
}

/// Parsed depth specification
#[derive(Debug, Clone)]
pub struct DepthSpec {
    seeds: Vec<String>,
    rules: Vec<DepthRule>,
}

impl DepthSpec {
    /// Builds a spec from seeds and the rules for depth 1..=N, in order
    pub fn new(seeds: Vec<String>, rules: Vec<DepthRule>) -> Self {
        Self { seeds, rules }
    }

    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    /// Deepest configured level; its URLs are the terminal batch
    pub fn max_depth(&self) -> usize {
        self.rules.len()
    }

    /// Rule for `depth`; depth 0 has no rule
    pub fn rule(&self, depth: usize) -> Option<&DepthRule> {
        depth.checked_sub(1).and_then(|i| self.rules.get(i))
    }

    /// Rule that turns URLs at `depth` into URLs at `depth + 1`
    pub fn next_rule(&self, depth: usize) -> Option<&DepthRule> {
        self.rule(depth + 1)
    }

    /// Iterates `(depth, rule)` for depth 1..=N
    pub fn rules(&self) -> impl Iterator<Item = (usize, &DepthRule)> {
        self.rules.iter().enumerate().map(|(i, rule)| (i + 1, rule))
    }
}

/// Loads a depth spec from a YAML file
pub fn load_depth_spec(path: &Path) -> Result<DepthSpec, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_depth_spec(&content)
}

/// Parses a depth spec from YAML text
pub fn parse_depth_spec(content: &str) -> Result<DepthSpec, ConfigError> {
    let raw: BTreeMap<String, Value> = serde_yaml::from_str(content)?;

    let mut levels = BTreeMap::new();
    for (key, value) in raw {
        let index = key
            .strip_prefix(DEPTH_KEY_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "unexpected key '{}' in depth spec (expected depth0..depthN)",
                    key
                ))
            })?;
        if levels.insert(index, value).is_some() {
            return Err(ConfigError::Validation(format!(
                "duplicate depth{} (key '{}' names a level already defined)",
                index, key
            )));
        }
    }

    if let Some(missing) = levels
        .keys()
        .enumerate()
        .find(|(position, index)| position != *index)
        .map(|(position, _)| position)
    {
        return Err(ConfigError::Validation(format!(
            "depth spec is missing depth{}",
            missing
        )));
    }

    let mut levels = levels.into_values();
    let seed_rule: SeedRule = match levels.next() {
        Some(value) => serde_yaml::from_value(value)?,
        None => {
            return Err(ConfigError::Validation(
                "depth spec must define depth0 with a seed_url".to_string(),
            ))
        }
    };

    let seeds = match seed_rule.seed_url {
        SeedUrls::One(url) => vec![url],
        SeedUrls::Many(urls) => urls,
    };
    if seeds.is_empty() {
        tracing::warn!("depth0 seed_url list is empty, nothing will be collected");
    }
    for seed in &seeds {
        Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;
    }

    let rules = levels
        .map(serde_yaml::from_value::<DepthRule>)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DepthSpec { seeds, rules })
}
