use crate::config::types::Config;
use crate::config::validation::validate;
use crate::plugin::FetchArgs;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a pipeline configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sdf_pipeline::config::load_config;
///
/// let config = load_config(Path::new("pipeline.toml")).unwrap();
/// println!("Base dir: {}", config.paths.base_dir.display());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = read(path)?;
    parse_config(&content)
}

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a run can be tied to the exact configuration it used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Loads the opaque fetch arguments for a fetch plugin
///
/// A missing or empty file yields empty arguments.
pub fn load_fetch_args(path: &Path) -> Result<FetchArgs, ConfigError> {
    if !path.exists() {
        tracing::debug!("No fetch args at {}, using none", path.display());
        return Ok(FetchArgs::new());
    }

    let content = read(path)?;
    if content.trim().is_empty() {
        return Ok(FetchArgs::new());
    }

    Ok(serde_yaml::from_str(&content)?)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}
