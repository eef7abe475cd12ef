/*!
common/src/lib.rs

Shared configuration types for newslist.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader for a TOML config file, with default/override merging
- Endpoint resolution for the news backend
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Path appended to `api.base_url` when `api.news_path` is not set.
pub const DEFAULT_NEWS_PATH: &str = "news";

/// Backend API configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the news backend (e.g. "http://localhost:8080/api")
    pub base_url: String,
    /// Path of the "get all news" endpoint, relative to `base_url`
    pub news_path: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

impl ApiConfig {
    /// Resolve the full URL of the news list endpoint.
    ///
    /// `base_url` is treated as a directory, so "http://host/api" with the default
    /// path resolves to "http://host/api/news".
    pub fn news_url(&self) -> Result<Url> {
        let mut base = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid api.base_url: {}", self.base_url))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let path = self
            .news_path
            .as_deref()
            .unwrap_or(DEFAULT_NEWS_PATH)
            .trim_start_matches('/');
        base.join(path)
            .with_context(|| format!("Invalid api.news_path: {}", path))
    }
}

/// HTTP server (page rendering) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g. "127.0.0.1")
    pub bind: Option<String>,
    pub port: Option<u16>,
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Text shown in the toolbar
    pub title: Option<String>,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub server: Option<ServerConfig>,
    pub display: Option<DisplayConfig>,
}

impl Config {
    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        for path in [default_path, override_path].into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            let data = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let val: toml::Value = toml::from_str(&data)
                .with_context(|| format!("Failed to parse configuration: {}", path.display()))?;
            merge_toml(&mut config_value, val);
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        Ok(cfg)
    }

    /// Toolbar title, falling back to "News".
    pub fn title(&self) -> &str {
        self.display
            .as_ref()
            .and_then(|d| d.title.as_deref())
            .unwrap_or("News")
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}
