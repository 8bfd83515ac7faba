//! Configuration module for the pipeline
//!
//! Two kinds of configuration live here:
//! - the pipeline config (TOML): paths, HTTP settings and plugin bindings
//! - per-site depth specs (YAML) that drive the collector
//!
//! # Example
//!
//! ```no_run
//! use sdf_pipeline::config::{load_config, load_depth_spec};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pipeline.toml")).unwrap();
//! let spec = load_depth_spec(Path::new("url_collector/catalog/books_catalog.yml")).unwrap();
//! println!("Collector will walk {} levels", spec.max_depth());
//! ```

mod depth;
mod layout;
mod parser;
mod types;
mod validation;

pub use depth::{load_depth_spec, parse_depth_spec, DepthRule, DepthSpec};
pub use layout::ProjectLayout;
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_fetch_args, parse_config,
};
pub use types::{
    Config, ExtractorKind, FetcherKind, HttpConfig, PathsConfig, SiteBinding,
    DEFAULT_TIMEOUT_SECS,
};
pub use validation::validate_name;
