use serde::Deserialize;
use std::path::PathBuf;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for the pipeline
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteBinding>,
}

/// Filesystem layout configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Root directory holding `url_collector/`, `url_fetcher/` and `scrape_output/`
    #[serde(rename = "base-dir", default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Directory for cached page bodies (defaults to `<base-dir>/cache`)
    #[serde(rename = "cache-dir", default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            cache_dir: None,
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,

    /// Whole-request timeout in seconds; 0 disables the timeout
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip TLS certificate validation
    #[serde(rename = "accept-invalid-certs", default)]
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: false,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Binds a (site, project) pair to built-in plugin implementations
#[derive(Debug, Clone, Deserialize)]
pub struct SiteBinding {
    pub site: String,
    pub project: String,

    /// Extractor used by the collector stage
    #[serde(default)]
    pub extractor: Option<ExtractorKind>,

    /// Fetcher used by the fetch stage
    #[serde(default)]
    pub fetcher: Option<FetcherKind>,
}

/// Built-in extractor implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractorKind {
    LinkSelector,
}

/// Built-in fetcher implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetcherKind {
    PageCache,
}
