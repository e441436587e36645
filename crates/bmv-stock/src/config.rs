//! Configuration for dashboard operations

use crate::error::{DashboardError, Result};
use bmv_utils::env_override;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Public Google endpoint used when no translation URL is configured
pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com";

/// Configuration for dashboard operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Cache TTL for validity checks and company data, keyed by ticker
    pub cache_ttl_market_data: Duration,

    /// Cache TTL for translations, keyed by source text
    pub cache_ttl_translation: Duration,

    /// Years of daily history requested per ticker
    pub history_years: u32,

    /// Largest chunk, in characters, sent per translation call
    pub translation_chunk_chars: usize,

    /// Source language passed to the translation provider
    pub source_language: String,

    /// Target language passed to the translation provider
    pub target_language: String,

    /// Request timeout for HTTP collaborators
    pub request_timeout: Duration,

    /// Base URL of the translation endpoint
    pub translate_base_url: String,

    /// Ticker roster to load instead of the bundled one
    pub roster_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            cache_ttl_market_data: Duration::from_secs(3600), // 1 hour
            cache_ttl_translation: Duration::from_secs(3600), // 1 hour
            history_years: 5,
            translation_chunk_chars: 5000,
            source_language: "auto".to_string(),
            target_language: "es".to_string(),
            request_timeout: Duration::from_secs(30),
            translate_base_url: DEFAULT_TRANSLATE_URL.to_string(),
            roster_path: None,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Apply `BMV_*` environment overrides
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(path) = env_override::<PathBuf>("BMV_ROSTER")? {
            self.roster_path = Some(path);
        }
        if let Some(secs) = env_override::<u64>("BMV_CACHE_TTL_SECS")? {
            self.cache_ttl_market_data = Duration::from_secs(secs);
            self.cache_ttl_translation = Duration::from_secs(secs);
        }
        if let Some(url) = env_override::<String>("BMV_TRANSLATE_URL")? {
            self.translate_base_url = url;
        }
        if let Some(secs) = env_override::<u64>("BMV_REQUEST_TIMEOUT_SECS")? {
            self.request_timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl_market_data.is_zero() || self.cache_ttl_translation.is_zero() {
            return Err(DashboardError::Config(
                "cache TTLs must be greater than 0".to_string(),
            ));
        }

        if self.history_years == 0 {
            return Err(DashboardError::Config(
                "history_years must be greater than 0".to_string(),
            ));
        }

        if self.translation_chunk_chars == 0 {
            return Err(DashboardError::Config(
                "translation_chunk_chars must be greater than 0".to_string(),
            ));
        }

        if self.target_language.trim().is_empty() {
            return Err(DashboardError::Config(
                "target_language must not be empty".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(DashboardError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Calendar days of history requested, 365 per configured year
    pub fn history_days(&self) -> i64 {
        i64::from(self.history_years) * 365
    }
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    cache_ttl_market_data: Option<Duration>,
    cache_ttl_translation: Option<Duration>,
    history_years: Option<u32>,
    translation_chunk_chars: Option<usize>,
    target_language: Option<String>,
    request_timeout: Option<Duration>,
    translate_base_url: Option<String>,
    roster_path: Option<PathBuf>,
}

impl DashboardConfigBuilder {
    /// Set cache TTL for market data
    pub fn cache_ttl_market_data(mut self, duration: Duration) -> Self {
        self.cache_ttl_market_data = Some(duration);
        self
    }

    /// Set cache TTL for translations
    pub fn cache_ttl_translation(mut self, duration: Duration) -> Self {
        self.cache_ttl_translation = Some(duration);
        self
    }

    /// Set years of history to request
    pub fn history_years(mut self, years: u32) -> Self {
        self.history_years = Some(years);
        self
    }

    /// Set the translation chunk size in characters
    pub fn translation_chunk_chars(mut self, chars: usize) -> Self {
        self.translation_chunk_chars = Some(chars);
        self
    }

    /// Set the translation target language
    pub fn target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = Some(language.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the translation endpoint base URL
    pub fn translate_base_url(mut self, url: impl Into<String>) -> Self {
        self.translate_base_url = Some(url.into());
        self
    }

    /// Set a roster file to load
    pub fn roster_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.roster_path = Some(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let defaults = DashboardConfig::default();

        let config = DashboardConfig {
            cache_ttl_market_data: self
                .cache_ttl_market_data
                .unwrap_or(defaults.cache_ttl_market_data),
            cache_ttl_translation: self
                .cache_ttl_translation
                .unwrap_or(defaults.cache_ttl_translation),
            history_years: self.history_years.unwrap_or(defaults.history_years),
            translation_chunk_chars: self
                .translation_chunk_chars
                .unwrap_or(defaults.translation_chunk_chars),
            source_language: defaults.source_language,
            target_language: self.target_language.unwrap_or(defaults.target_language),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            translate_base_url: self
                .translate_base_url
                .unwrap_or(defaults.translate_base_url),
            roster_path: self.roster_path,
        };

        config.validate()?;
        Ok(config)
    }
}
