//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use marquee_feed::{DEFAULT_TRENDING_LIMIT, FeedConfig};
use serde::{Deserialize, Serialize};
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Movie API settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Trend store settings.
    #[serde(default)]
    pub trends: TrendsConfig,
    /// Terminal UI timing.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Movie API configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmdbConfig {
    /// API base URL override (default: `https://api.themoviedb.org/3/`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Response language.
    pub language: String,
    /// Fixed endpoint listed by the top-rated carousel.
    pub top_rated_endpoint: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            language: String::from("en-US"),
            top_rated_endpoint: String::from("movie/top_rated?language=en-US&page=1"),
        }
    }
}

impl TmdbConfig {
    /// Parses the base URL override.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is set but not a valid URL.
    pub fn base_url(&self) -> Result<Option<Url>> {
        self.base_url
            .as_deref()
            .map(|raw| Url::parse(raw).with_context(|| format!("invalid tmdb.base_url: {raw}")))
            .transpose()
    }
}

/// Trend store configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrendsConfig {
    /// Record searches and show the trending strip.
    pub enabled: bool,
    /// Document store endpoint.
    pub endpoint: String,
    /// Store project ID.
    pub project_id: String,
    /// Database ID.
    pub database_id: String,
    /// Collection ID holding one document per search term.
    pub collection_id: String,
    /// Number of trending entries shown.
    pub limit: u32,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::from("https://cloud.appwrite.io/v1/"),
            project_id: String::new(),
            database_id: String::new(),
            collection_id: String::new(),
            limit: DEFAULT_TRENDING_LIMIT,
        }
    }
}

impl TrendsConfig {
    /// Parses the store endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `endpoint` is not a valid URL.
    pub fn endpoint_url(&self) -> Result<Url> {
        Url::parse(&self.endpoint)
            .with_context(|| format!("invalid trends.endpoint: {}", self.endpoint))
    }
}

/// Terminal UI timing.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    /// Quiet period after typing before a search is sent.
    pub debounce_ms: u64,
    /// Number of movies in the top-rated carousel.
    pub carousel_limit: usize,
    /// Animation tick interval.
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            carousel_limit: 10,
            tick_ms: 120,
        }
    }
}

impl UiConfig {
    /// Animation tick interval, at least one millisecond.
    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Feed settings derived from this config.
    #[must_use]
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            debounce: Duration::from_millis(self.ui.debounce_ms),
            language: self.tmdb.language.clone(),
        }
    }
}
