use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::resolver::BoundingBox;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub limits: LimitsConfig,
    pub bounds: BoundingBox,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub country_code: String,
    pub country_name: String,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            country_code: "ph".to_string(),
            country_name: "Philippines".to_string(),
            user_agent: "Narra/0.1 (office-address geocoder)".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LimitsConfig {
    /// Minimum spacing between outbound provider requests.
    pub min_interval_ms: u64,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 1000,
            timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.limits.min_interval_ms, 1000);
        assert_eq!(config.limits.timeout_secs, 10);
        assert_eq!(config.provider.country_code, "ph");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [limits]
            min_interval_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.limits.min_interval_ms, 250);
        assert_eq!(config.limits.timeout_secs, 10);
        assert_eq!(config.provider.country_name, "Philippines");
        assert!(config.bounds.contains(14.6, 121.0));
    }

    #[test]
    fn test_partial_bounds_fill_defaults() {
        let config: Config = toml::from_str(
            r#"
            [bounds]
            north = 22.0
            "#,
        )
        .unwrap();
        assert_eq!(config.bounds.north, 22.0);
        assert_eq!(config.bounds.south, BoundingBox::PHILIPPINES.south);
        assert_eq!(config.bounds.west, BoundingBox::PHILIPPINES.west);
        assert_eq!(config.bounds.east, BoundingBox::PHILIPPINES.east);
    }
}
