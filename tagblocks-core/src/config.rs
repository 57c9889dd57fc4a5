//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/tagblocks/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/tagblocks/` (~/.config/tagblocks/)
//! - State/Logs: `$XDG_STATE_HOME/tagblocks/` (~/.local/state/tagblocks/)
//!
//! Every section is optional. A missing section leaves that part of the
//! pipeline unconfigured, which the tracker and reporter treat as a silent
//! no-op rather than an error.

use crate::error::{Error, Result};
use crate::types::BlocksSetting;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

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

/// Treats blank strings the same as missing values.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Block definitions
    #[serde(default)]
    pub blocks: BlocksConfig,

    /// Click tracking endpoint
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Error report channel credentials
    #[serde(default)]
    pub reporting: ReportingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configured content blocks
#[derive(Debug, Deserialize, Default, Clone)]
pub struct BlocksConfig {
    /// Either a JSON string or an inline array of block tables
    #[serde(default)]
    pub definitions: BlocksSetting,
}

/// Click tracking configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct TrackingConfig {
    /// URL that receives `{placementID, campaignID}` on every click
    pub api_endpoint: Option<String>,
}

impl TrackingConfig {
    /// The tracking endpoint, if one is configured and not blank
    pub fn endpoint(&self) -> Option<&str> {
        non_blank(&self.api_endpoint)
    }

    /// Check if tracking is configured
    pub fn is_ready(&self) -> bool {
        self.endpoint().is_some()
    }
}

/// Error report channel configuration
///
/// Reports are posted to `/posts` on the forum hosting the page, using a
/// privileged API key under the `system` username.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ReportingConfig {
    /// Privileged write credential
    pub api_key: Option<String>,

    /// Category the report topic is filed under
    #[serde(default, deserialize_with = "string_or_integer")]
    pub category_id: Option<String>,

    /// Base URL for `/posts` (defaults to the page origin)
    pub report_url: Option<String>,
}

impl ReportingConfig {
    /// The API key, if configured and not blank
    pub fn api_key(&self) -> Option<&str> {
        non_blank(&self.api_key)
    }

    /// The category ID, if configured and not blank
    pub fn category_id(&self) -> Option<&str> {
        non_blank(&self.category_id)
    }

    /// The report base URL override, if configured and not blank
    pub fn report_url(&self) -> Option<&str> {
        non_blank(&self.report_url)
    }

    /// Check if both required credentials are present
    pub fn is_ready(&self) -> bool {
        self.api_key().is_some() && self.category_id().is_some()
    }
}

/// Accepts `category_id = 7` as well as `category_id = "7"`.
fn string_or_integer<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
    }))
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
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
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/tagblocks/config.toml` (~/.config/tagblocks/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("tagblocks").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/tagblocks/` (~/.local/state/tagblocks/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("tagblocks")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/tagblocks/tagblocks.log` (~/.local/state/tagblocks/tagblocks.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("tagblocks.log")
    }

    /// Ensure XDG base directory environment variables are set.
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
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.blocks.definitions.definitions().is_empty());
        assert!(!config.tracking.is_ready());
        assert!(!config.reporting.is_ready());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config_with_json_blocks() {
        let toml = r#"
[blocks]
definitions = '[{"html":"<p>hi</p>","tags":["rust"],"placementID":"p1","campaignID":"c1"}]'

[tracking]
api_endpoint = "https://track.example.com/click"

[reporting]
api_key = "secret"
category_id = "7"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        let defs = config.blocks.definitions.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].placement_id.as_deref(), Some("p1"));
        assert_eq!(
            config.tracking.endpoint(),
            Some("https://track.example.com/click")
        );
        assert!(config.reporting.is_ready());
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_parse_config_with_inline_blocks() {
        let toml = r#"
[[blocks.definitions]]
html = "<p>one</p>"
tags = ["a", "b"]
placementID = "p1"

[[blocks.definitions]]
html = "<p>two</p>"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        let defs = config.blocks.definitions.definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].tags, vec!["a", "b"]);
        assert!(defs[0].campaign_id.is_none());
        assert!(defs[1].tags.is_empty());
    }

    #[test]
    fn test_category_id_accepts_integer() {
        let toml = r#"
[reporting]
api_key = "secret"
category_id = 42
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.reporting.category_id(), Some("42"));
    }

    #[test]
    fn test_blank_values_are_unconfigured() {
        let toml = r#"
[tracking]
api_endpoint = "   "

[reporting]
api_key = ""
category_id = "7"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.tracking.is_ready());
        assert!(!config.reporting.is_ready());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tracking]\napi_endpoint = \"http://localhost/t\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.tracking.endpoint(), Some("http://localhost/t"));
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tracking\napi_endpoint = ").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_log_path() {
        assert!(Config::log_path().ends_with("tagblocks/tagblocks.log"));
    }
}
