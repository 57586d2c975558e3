use crate::constants::CONFIG_PATH;
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::io;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the paginated catalog.
    pub base_url: String,
    /// First page of the default scrape range.
    pub start_page: u32,
    /// Last page of the default scrape range.
    pub end_page: u32,
    /// Fixed conversion rate applied to every USD price.
    pub usd_to_idr_rate: f64,
    /// Politeness delay between successive page fetches.
    pub delay_ms: u64,
    /// Per-request timeout for page fetches.
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://fashion-studio.dicoding.dev".to_string(),
            start_page: 1,
            end_page: 50,
            usd_to_idr_rate: 16_000.0,
            delay_ms: 500,
            timeout_seconds: 30,
        }
    }
}

impl Config {
    /// Loads `config.toml` if present, falling back to the built-in defaults.
    pub fn load() -> Result<Self> {
        match fs::read_to_string(CONFIG_PATH) {
            Ok(content) => {
                let config: Config = toml::from_str(&content)?;
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ScraperError::Config(format!(
                "Failed to read config file '{CONFIG_PATH}': {e}"
            ))),
        }
    }
}
