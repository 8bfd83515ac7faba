use crate::config::types::{Config, HttpConfig, SiteBinding};
use crate::ConfigError;
use std::collections::HashSet;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_site_bindings(&config.sites)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if let Some(user_agent) = &config.user_agent {
        if user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates site bindings: names must be usable as file name components
/// and each (site, project) pair may appear only once
fn validate_site_bindings(bindings: &[SiteBinding]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for binding in bindings {
        validate_name("site", &binding.site)?;
        validate_name("project", &binding.project)?;

        if !seen.insert((binding.site.as_str(), binding.project.as_str())) {
            return Err(ConfigError::Validation(format!(
                "duplicate site binding for {}_{}",
                binding.site, binding.project
            )));
        }
    }

    Ok(())
}

/// Validates a site or project name
///
/// Names end up in file paths, so only alphanumerics, hyphens and
/// underscores are allowed.
pub fn validate_name(kind: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", kind)));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "{} must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            kind, name
        )));
    }

    Ok(())
}
