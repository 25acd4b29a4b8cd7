//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/introtrack/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/introtrack/` (~/.config/introtrack/)
//! - State/Logs: `$XDG_STATE_HOME/introtrack/` (~/.local/state/introtrack/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Collector endpoint configuration
    #[serde(default)]
    pub collector: CollectorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// How the summary endpoint is read.
///
/// `Callback` exists for collectors that cannot set permissive
/// cross-origin headers and instead wrap the response body in a
/// named callback (`name({...})`). A collector with proper CORS
/// headers should always use `Direct`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Direct,
    Callback,
}

/// How the wire-level `completionRate` value is interpreted.
///
/// Deployed collectors have been observed returning the rate as an
/// already-scaled percentage (40 for 40%) and as a fraction in [0, 1].
/// `Percent` is the canonical convention; `Fraction` multiplies by 100
/// during normalization.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RateConvention {
    #[default]
    Percent,
    Fraction,
}

impl RateConvention {
    /// Convert a wire-level rate value to a percentage
    pub fn to_percent(self, raw: f64) -> f64 {
        match self {
            RateConvention::Percent => raw,
            RateConvention::Fraction => raw * 100.0,
        }
    }
}

/// Collector endpoint configuration
///
/// Both the event emitter and the summary reader point at the same
/// collector URL. When no URL is configured, tracking is disabled and
/// the summary reader refuses to start.
#[derive(Debug, Deserialize, Clone)]
pub struct CollectorConfig {
    /// Collector URL (e.g., `https://collector.example.com/exec`)
    pub url: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_collector_timeout")]
    pub timeout_secs: u64,

    /// Summary read strategy
    #[serde(default)]
    pub transport: TransportMode,

    /// Callback name used by the `callback` transport mode
    #[serde(default = "default_callback_name")]
    pub callback_name: String,

    /// How the collector reports `completionRate`
    #[serde(default)]
    pub rate_convention: RateConvention,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_collector_timeout(),
            transport: TransportMode::default(),
            callback_name: default_callback_name(),
            rate_convention: RateConvention::default(),
        }
    }
}

impl CollectorConfig {
    /// Check if the collector is configured at all
    pub fn is_ready(&self) -> bool {
        self.url.is_some()
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        let url = match &self.url {
            Some(url) => url,
            None => {
                return Err(Error::Config(
                    "collector.url is required".to_string(),
                ))
            }
        };

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Config(format!(
                "collector.url must be an http(s) URL, got {:?}",
                url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "collector.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.transport == TransportMode::Callback && self.callback_name.is_empty() {
            return Err(Error::Config(
                "collector.callback_name must not be empty in callback mode".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_collector_timeout() -> u64 {
    30
}

fn default_callback_name() -> String {
    "onSummary".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/introtrack/config.toml` (~/.config/introtrack/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("introtrack").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/introtrack/` (~/.local/state/introtrack/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("introtrack")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/introtrack/introtrack.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("introtrack.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.collector.url.is_none());
        assert!(!config.collector.is_ready());
        assert_eq!(config.collector.timeout_secs, 30);
        assert_eq!(config.collector.transport, TransportMode::Direct);
        assert_eq!(config.collector.rate_convention, RateConvention::Percent);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[collector]
url = "https://collector.example.com/exec"
timeout_secs = 10
transport = "callback"
callback_name = "handleSummary"
rate_convention = "fraction"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(
            config.collector.url.as_deref(),
            Some("https://collector.example.com/exec")
        );
        assert_eq!(config.collector.timeout_secs, 10);
        assert_eq!(config.collector.transport, TransportMode::Callback);
        assert_eq!(config.collector.callback_name, "handleSummary");
        assert_eq!(config.collector.rate_convention, RateConvention::Fraction);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_collector_config_validation() {
        // Missing URL should fail
        let config = CollectorConfig::default();
        assert!(config.validate().is_err());

        // Non-http URL should fail
        let config = CollectorConfig {
            url: Some("ftp://collector.example.com".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // Valid URL should pass
        let config = CollectorConfig {
            url: Some("https://collector.example.com/exec".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.is_ready());
    }

    #[test]
    fn test_callback_mode_requires_name() {
        let config = CollectorConfig {
            url: Some("https://collector.example.com/exec".to_string()),
            transport: TransportMode::Callback,
            callback_name: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rate_convention_to_percent() {
        assert_eq!(RateConvention::Percent.to_percent(40.0), 40.0);
        assert_eq!(RateConvention::Fraction.to_percent(0.4), 40.0);
        assert_eq!(RateConvention::Fraction.to_percent(0.0), 0.0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[collector]\nurl = \"https://collector.example.com/exec\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.collector.is_ready());
    }
}
