use crate::domain::battle::RANDOM_BATTLE;
use crate::domain::score::Metric;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_FEED_URL: &str = "ws://localhost:15455";
pub const DEFAULT_REFERENCE_URL: &str = "https://static.modxvm.com/wn8-data-exp/json/wn8exp.json";
pub const FEED_URL_ENV: &str = "BATTLE_FEED_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Wire dialect spoken by the battle results server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeedProtocol {
    /// JSON-RPC 2.0 batch request, `subscription` notifications
    #[default]
    JsonRpc,
    /// `{"messageType": ..., "payload": ...}` envelopes
    Envelope,
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigOrigin {
    #[default]
    Defaults,
    File(PathBuf),
    /// The file was absent, so defaults were used
    MissingFile(PathBuf),
}

/// Overlay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub feed: FeedConfig,
    pub scoring: ScoringConfig,
    pub reference: ReferenceConfig,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    #[serde(skip)]
    pub origin: ConfigOrigin,
    /// Set when `BATTLE_FEED_URL` replaced `feed.url`
    #[serde(skip)]
    pub feed_url_from_env: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            scoring: ScoringConfig::default(),
            reference: ReferenceConfig::default(),
            log_level: default_log_level(),
            origin: ConfigOrigin::Defaults,
            feed_url_from_env: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    pub protocol: FeedProtocol,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            protocol: FeedProtocol::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub metric: Metric,
    /// Battle-mode codes that count toward the score
    pub ranked_modes: Vec<u32>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            ranked_modes: vec![RANDOM_BATTLE],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub url: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REFERENCE_URL.to_string(),
        }
    }
}

impl OverlayConfig {
    /// Load configuration from YAML file
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let yaml_content = std::fs::read_to_string(config_path)?;
        let mut config: OverlayConfig = serde_yaml::from_str(&yaml_content)?;
        config.origin = ConfigOrigin::File(config_path.to_path_buf());
        config.finish()
    }

    /// Like `load`, but a missing file means defaults
    ///
    /// Nothing is logged here; `log` reports the origin once tracing is up.
    pub fn load_or_default(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        if config_path.exists() {
            return Self::load(config_path);
        }

        let mut config = Self::default();
        config.origin = ConfigOrigin::MissingFile(config_path.to_path_buf());
        config.finish()
    }

    fn finish(mut self) -> Result<Self> {
        self.override_feed_url(std::env::var(FEED_URL_ENV).ok());
        self.validate()?;
        Ok(self)
    }

    fn override_feed_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.feed.url = url;
            self.feed_url_from_env = true;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(self.feed.url.starts_with("ws://") || self.feed.url.starts_with("wss://")) {
            return Err(ConfigError::ValidationError(
                "feed.url must start with ws:// or wss://".to_string(),
            ));
        }

        if self.scoring.ranked_modes.is_empty() {
            return Err(ConfigError::ValidationError(
                "scoring.ranked_modes cannot be empty".to_string(),
            ));
        }

        if self.scoring.metric.needs_reference()
            && !(self.reference.url.starts_with("http://")
                || self.reference.url.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(
                "reference.url must be an http(s) URL when scoring WN8".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Log configuration summary
    pub fn log(&self) {
        match &self.origin {
            ConfigOrigin::File(path) => info!("Configuration loaded from {}:", path.display()),
            ConfigOrigin::MissingFile(path) => {
                warn!("Config file {} not found, using defaults", path.display());
                info!("Configuration loaded:");
            }
            ConfigOrigin::Defaults => info!("Configuration loaded:"),
        }
        info!("  Feed: {} ({:?})", self.feed.url, self.feed.protocol);
        if self.feed_url_from_env {
            info!("  Feed URL overridden by {}", FEED_URL_ENV);
        }
        info!("  Metric: {}", self.scoring.metric);
        info!("  Ranked modes: {:?}", self.scoring.ranked_modes);
        if self.scoring.metric.needs_reference() {
            info!("  Expected values: {}", self.reference.url);
        }
        info!("  Log level: {}", self.log_level);
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> OverlayConfig {
        OverlayConfig::default()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = valid();
        assert!(config.validate().is_ok());
        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.feed.protocol, FeedProtocol::JsonRpc);
        assert_eq!(config.scoring.metric, Metric::Wn8);
        assert_eq!(config.scoring.ranked_modes, vec![1]);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: OverlayConfig = serde_yaml::from_str(
            "scoring:\n  metric: win_rate\nfeed:\n  protocol: envelope\n",
        )
        .unwrap();
        assert_eq!(config.scoring.metric, Metric::WinRate);
        assert_eq!(config.scoring.ranked_modes, vec![1]);
        assert_eq!(config.feed.protocol, FeedProtocol::Envelope);
        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.reference.url, DEFAULT_REFERENCE_URL);
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid();

        config.feed.url = "http://localhost:15455".to_string();
        assert!(config.validate().is_err());
        config.feed.url = DEFAULT_FEED_URL.to_string();

        config.scoring.ranked_modes.clear();
        assert!(config.validate().is_err());
        config.scoring.ranked_modes = vec![1];

        config.reference.url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
        // reference only matters for WN8
        config.scoring.metric = Metric::WinRate;
        assert!(config.validate().is_ok());

        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scoring:\n  metric: win_rate\nlog_level: warn").unwrap();

        let config = OverlayConfig::load(file.path()).unwrap();
        assert_eq!(config.scoring.metric, Metric::WinRate);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.origin, ConfigOrigin::File(file.path().to_path_buf()));

        writeln!(file, "log_level: shout").unwrap();
        assert!(matches!(
            OverlayConfig::load(file.path()),
            Err(ConfigError::ValidationError(_)) | Err(ConfigError::YamlError(_))
        ));
    }

    #[test]
    fn test_feed_url_override() {
        let mut config = valid();
        config.override_feed_url(None);
        assert!(!config.feed_url_from_env);

        config.override_feed_url(Some("ws://127.0.0.1:9000".to_string()));
        assert_eq!(config.feed.url, "ws://127.0.0.1:9000");
        assert!(config.feed_url_from_env);

        config.override_feed_url(Some(String::new()));
        assert_eq!(config.feed.url, "ws://127.0.0.1:9000");

        config.override_feed_url(None);
        assert_eq!(config.feed.url, "ws://127.0.0.1:9000");
    }
}
