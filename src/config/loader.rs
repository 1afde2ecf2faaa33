//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration: TOML file (or defaults when no path is given),
/// then environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay secrets and deployment specific values from the environment.
///
/// - `QUIZHUB_BIND_ADDRESS`, `QUIZHUB_PUBLIC_URL`
/// - `QUIZHUB_DATABASE_URL`
/// - `QUIZHUB_ADMIN_EMAILS` (comma separated, replaces the file list)
/// - `QUIZHUB_OAUTH_<NAME>_CLIENT_ID` / `QUIZHUB_OAUTH_<NAME>_CLIENT_SECRET`
pub fn apply_env_overrides<F>(config: &mut AppConfig, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = var("QUIZHUB_BIND_ADDRESS") {
        config.server.bind_address = addr;
    }
    if let Some(url) = var("QUIZHUB_PUBLIC_URL") {
        config.server.public_url = url;
    }
    if let Some(url) = var("QUIZHUB_DATABASE_URL") {
        config.database.url = url;
    }
    if let Some(emails) = var("QUIZHUB_ADMIN_EMAILS") {
        config.admin.emails = emails
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();
    }
    for provider in &mut config.auth.providers {
        let prefix = format!("QUIZHUB_OAUTH_{}", provider.name.to_uppercase().replace('-', "_"));
        if let Some(id) = var(&format!("{prefix}_CLIENT_ID")) {
            provider.client_id = id;
        }
        if let Some(secret) = var(&format!("{prefix}_CLIENT_SECRET")) {
            provider.client_secret = secret;
        }
    }
}
