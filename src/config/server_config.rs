//! Server configuration
//!
//! Values are layered, later sources winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`JOKES_CONFIG`, else `./jokes.toml` when present)
//! 3. Environment variables (`PORT`, `JOKES_HOST`, `JOKES_FILE`, `JOKES_PERSIST_ON_CLEAR`)
//! 4. CLI flags, applied by the binary

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::defaults;
use crate::storage::StoreOptions;

/// Runtime configuration for the joke service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen host.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Backing JSON file.
    pub data_file: PathBuf,
    /// Persist the empty collection on `DELETE /jokes`.
    pub persist_on_clear: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
            data_file: PathBuf::from(defaults::DEFAULT_DATA_FILE),
            persist_on_clear: defaults::DEFAULT_PERSIST_ON_CLEAR,
        }
    }
}

impl ServerConfig {
    /// Load from file (if any) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_file_or_default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// `JOKES_CONFIG`, then `./jokes.toml`, then defaults.
    ///
    /// A file that fails to load is logged and skipped.
    fn load_file_or_default() -> Self {
        if let Ok(path) = std::env::var(defaults::ENV_CONFIG) {
            let p = PathBuf::from(&path);
            match Self::load_from_file(&p) {
                Ok(config) => {
                    info!(path = %p.display(), "Loaded config from {}", defaults::ENV_CONFIG);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load config from {}, falling back", defaults::ENV_CONFIG);
                }
            }
        }

        let local = PathBuf::from(defaults::CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{}", defaults::CONFIG_FILE_NAME);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::CONFIG_FILE_NAME);
                }
            }
        }

        Self::default()
    }

    /// Override fields from environment variables resolved by `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get(defaults::ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_env(defaults::ENV_PORT, &port))?;
        }
        if let Some(host) = get(defaults::ENV_HOST) {
            self.host = host;
        }
        if let Some(file) = get(defaults::ENV_DATA_FILE) {
            self.data_file = PathBuf::from(file);
        }
        if let Some(flag) = get(defaults::ENV_PERSIST_ON_CLEAR) {
            self.persist_on_clear = parse_flag(&flag)
                .ok_or_else(|| ConfigError::invalid_env(defaults::ENV_PERSIST_ON_CLEAR, &flag))?;
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            path: self.data_file.clone(),
            persist_on_clear: self.persist_on_clear,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: String, value: String },
}

impl ConfigError {
    fn invalid_env(key: &str, value: &str) -> Self {
        Self::InvalidEnv {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.data_file, PathBuf::from("jokes.json"));
        assert!(!config.persist_on_clear);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_env(env(&[
                ("PORT", "8081"),
                ("JOKES_HOST", "127.0.0.1"),
                ("JOKES_FILE", "/tmp/j.json"),
                ("JOKES_PERSIST_ON_CLEAR", "yes"),
            ]))
            .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8081");
        assert_eq!(config.data_file, PathBuf::from("/tmp/j.json"));
        assert!(config.persist_on_clear);
        assert!(config.store_options().persist_on_clear);
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = ServerConfig::default();
        config.apply_env(env(&[("PORT", "")])).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_env_values() {
        let mut config = ServerConfig::default();
        let err = config.apply_env(env(&[("PORT", "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref key, .. } if key == "PORT"));

        let err = config
            .apply_env(env(&[("JOKES_PERSIST_ON_CLEAR", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("JOKES_PERSIST_ON_CLEAR"));
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jokes.toml");
        std::fs::write(&path, "port = 4000\npersist_on_clear = true\n").unwrap();

        let config = ServerConfig::load_from_file(&path).unwrap();
        assert_eq!(config.port, 4000);
        assert!(config.persist_on_clear);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_load_from_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jokes.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();
        assert!(matches!(
            ServerConfig::load_from_file(&path),
            Err(ConfigError::Parse(..))
        ));
        assert!(matches!(
            ServerConfig::load_from_file(&dir.path().join("missing.toml")),
            Err(ConfigError::Io(..))
        ));
    }
}
