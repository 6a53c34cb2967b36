//! Scraper configuration
//!
//! Settings are loaded from a YAML file (JSON also parses, being a YAML
//! subset). Every field has a default, so an empty document is a valid
//! configuration.
//!
//! ```yaml
//! country: GB
//! language: en
//! pause_time: 4.5
//! timeout: 15
//! headless: false
//! download_dir: ./downloads
//! ```

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest accepted base pause, in seconds (one day)
pub const MAX_PAUSE_SECS: f64 = 86_400.0;

/// Desktop browser User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/105.0.0.0 Safari/537.36";

/// Complete scraper configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Country code sent with listing requests
    pub country: String,

    /// Language code sent with listing requests
    pub language: String,

    /// Base pause between paginated calls, in seconds
    pub pause_time: f64,

    /// Request timeout, in seconds
    pub timeout: u64,

    /// Run the browser without a window
    pub headless: bool,

    /// Directory downloaded videos are written to
    pub download_dir: PathBuf,

    /// Comment limit used when none is given
    pub max_video_comments: usize,

    /// WebDriver server the browser session connects to
    pub webdriver_url: String,

    /// User-Agent header for API and download requests
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            language: "en".to_string(),
            pause_time: 3.0,
            timeout: 10,
            headless: true,
            download_dir: PathBuf::from("videos"),
            max_video_comments: 10,
            webdriver_url: "http://localhost:4444".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // serde_yaml rejects an empty document for a struct
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<()> {
        if self.country.trim().is_empty() {
            return Err(Error::missing_field("country"));
        }
        if self.language.trim().is_empty() {
            return Err(Error::missing_field("language"));
        }
        if !(0.0..=MAX_PAUSE_SECS).contains(&self.pause_time) {
            return Err(Error::invalid_value(
                "pause_time",
                format!(
                    "must be between 0 and {MAX_PAUSE_SECS} seconds, got {}",
                    self.pause_time
                ),
            ));
        }
        if self.timeout == 0 {
            return Err(Error::invalid_value("timeout", "must be at least 1 second"));
        }
        url::Url::parse(&self.webdriver_url)?;
        Ok(())
    }

    /// Base pause as a duration
    pub fn pause(&self) -> Duration {
        Duration::try_from_secs_f64(self.pause_time.clamp(0.0, MAX_PAUSE_SECS)).unwrap_or_default()
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Rate limiter settings derived from this config
    pub fn rate_limit(&self) -> RateLimiterConfig {
        RateLimiterConfig::new(self.pause())
    }

    /// HTTP client settings derived from this config
    pub fn http_client(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .timeout(self.timeout())
            .user_agent(&self.user_agent)
            .build()
    }
}
