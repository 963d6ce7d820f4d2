//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: USER_SEARCH_, sections split on `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/user-search/config.toml
//! 4. System directory: /etc/user-search/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "USER_SEARCH_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Search endpoint configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Client configuration
    #[serde(default)]
    pub client: ClientConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Search endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Path of the XML dataset, re-read on every request
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Shared secret expected in the `AccessToken` header
    #[serde(default = "default_access_token")]
    pub access_token: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            access_token: default_access_token(),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the search endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Token sent in the `AccessToken` header
    #[serde(default = "default_access_token")]
    pub access_token: String,

    /// Per-call timeout in milliseconds
    #[serde(default = "default_client_timeout_ms")]
    pub timeout_ms: u64,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: default_access_token(),
            timeout_ms: default_client_timeout_ms(),
        }
    }
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("dataset.xml")
}

fn default_access_token() -> String {
    "CorrectToken".to_string()
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_client_timeout_ms() -> u64 {
    1000
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Searches for config files in this order (first found wins):
    /// 1. Current working directory: ./config.toml
    /// 2. XDG config directory: ~/.config/user-search/config.toml
    /// 3. System directory: /etc/user-search/config.toml
    ///
    /// Environment variables (USER_SEARCH_ prefix) override all file-based configs.
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses the search path and loads directly from the given path.
    pub fn load_from(path: &str) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Find all possible config file paths
    ///
    /// Returns paths in priority order (highest first).
    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix("user-search");
        if let Some(path) = xdg_dirs.find_config_file("config.toml") {
            paths.push(path);
        }

        paths.push(PathBuf::from("/etc/user-search/config.toml"));

        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "user-search".to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
            },
            search: SearchConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 8080);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.search.dataset_path, PathBuf::from("dataset.xml"));
        assert_eq!(config.client.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
name = "people"
port = 9000

[search]
dataset_path = "/srv/people.xml"
access_token = "s3cret"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.service.name, "people");
        assert_eq!(config.service.port, 9000);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.search.access_token, "s3cret");
        assert_eq!(config.search.dataset_path, PathBuf::from("/srv/people.xml"));
        assert_eq!(config.client.timeout_ms, 1000);
    }

    #[test]
    fn test_load_from_rejects_wrong_types() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service]\nport = \"not a port\"").unwrap();

        let err = Config::load_from(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
