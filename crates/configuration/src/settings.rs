use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its defaults, so an empty or missing
/// `config.toml` yields a working setup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub cache: CacheConfig,
    pub analysis: AnalysisConfig,
    pub server: ServerConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.url.trim().is_empty() {
            return Err(ConfigError::ValidationError("feed.url must not be empty".into()));
        }
        if self.feed.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "feed.timeout must be greater than zero".into(),
            ));
        }
        if self.feed.strength_indicator.is_empty() || self.feed.breadth_indicator.is_empty() {
            return Err(ConfigError::ValidationError(
                "feed indicator names must not be empty".into(),
            ));
        }
        if self.analysis.window_size == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.window_size must be a positive integer".into(),
            ));
        }
        self.server.socket_addr()?;
        Ok(())
    }
}

/// Where and how to fetch the sentiment feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// The JSON endpoint serving the index and its component indicators.
    pub url: String,
    /// The feed rejects requests without a browser-like user agent.
    pub user_agent: String,
    /// Upper bound on the whole request, connect included.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Key under `indicators` holding the strength series.
    pub strength_indicator: String,
    /// Key under `indicators` holding the breadth series.
    pub breadth_indicator: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "https://production.dataviz.cnn.io/index/feargreed/static/data".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            timeout: Duration::from_secs(5),
            strength_indicator: "stock_price_strength".to_string(),
            breadth_indicator: "stock_price_breadth".to_string(),
        }
    }
}

/// Lifetime of cached feed responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// A zero TTL disables caching.
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of trailing days the z-scores are computed over.
    pub window_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { window_size: 20 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|e| {
            ConfigError::ValidationError(format!("server.host '{}' is not an IP address: {e}", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

/// Presentation settings for the dashboard page.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    /// Shown in place of the chart whenever no report can be produced.
    pub fallback_message: String,
    /// How often the page reloads itself. Zero disables reloading.
    #[serde(with = "humantime_serde")]
    pub refresh_interval: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Market Sentiment Quadrant (Z-score)".to_string(),
            fallback_message: "Sentiment data is unavailable from the feed right now. \
                               Please try again in a moment."
                .to_string(),
            refresh_interval: Duration::from_secs(3600),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file here.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Full,
            directory: None,
        }
    }
}
