pub mod find;
pub mod serve;

use anyhow::{Context, Result};
use user_search::config::Config;

/// Load configuration from `path`, or from the default search path when absent
pub fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration from {path}")),
        None => Config::load().context("Failed to load configuration"),
    }
}
