//! Configuration management for spill.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::{AddrParseError, IpAddr};
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "spill";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables, prefixed with `SPILL_` and using a double
///    underscore between the section and the key (for example
///    `SPILL_MONITOR__POLL_INTERVAL_MS`, `SPILL_SERVER__PORT`)
/// 2. TOML config file at `~/.config/spill/config.toml`
/// 3. Default values
///
/// CLI flags override loaded values after the fact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Monitor configuration.
    pub monitor: MonitorConfig,
    /// Server configuration.
    pub server: ServerConfig,
}

/// Clipboard monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Base URL of the collector server.
    pub server_url: String,
    /// Opaque identifier sent with every broadcast.
    pub user_id: String,
    /// Interval between clipboard reads in polling mode, in milliseconds.
    pub poll_interval_ms: u64,
    /// Wait after a failed poll cycle, in milliseconds.
    pub error_backoff_ms: u64,
    /// Timeout for outbound broadcast requests, in seconds.
    pub request_timeout_secs: u64,
    /// Skip the native listener probe and poll unconditionally.
    pub force_polling: bool,
}

/// Collector server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding the two log files.
    pub log_dir: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".to_string(),
            user_id: "user123".to_string(),
            poll_interval_ms: 500,
            error_backoff_ms: 1000,
            request_timeout_secs: 5,
            force_polling: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            // Split on a double underscore so snake_case keys survive:
            // SPILL_MONITOR__POLL_INTERVAL_MS -> monitor.poll_interval_ms
            .merge(Env::prefixed("SPILL_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.poll_interval_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "poll_interval_ms must be greater than 0".to_string(),
            });
        }

        if self.monitor.request_timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "request_timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.monitor.server_url.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "server_url must not be empty".to_string(),
            });
        }

        if self.monitor.user_id.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "user_id must not be empty".to_string(),
            });
        }

        if let Err(e) = self.listen_ip() {
            return Err(Error::ConfigValidation {
                message: format!("invalid listen host '{}': {e}", self.server.host),
            });
        }

        Ok(())
    }

    /// Parse the configured listen host.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not a valid IP address.
    pub fn listen_ip(&self) -> std::result::Result<IpAddr, AddrParseError> {
        self.server.host.parse()
    }

    /// The server URL with any trailing slash removed.
    #[must_use]
    pub fn server_url(&self) -> &str {
        self.monitor.server_url.trim_end_matches('/')
    }

    /// The full broadcast endpoint for this monitor's user id.
    #[must_use]
    pub fn broadcast_endpoint(&self) -> String {
        format!("{}/{}", self.server_url(), self.monitor.user_id)
    }

    /// Get the poll interval as a Duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.monitor.poll_interval_ms)
    }

    /// Get the error backoff as a Duration.
    #[must_use]
    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.monitor.error_backoff_ms)
    }

    /// Get the broadcast request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.monitor.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.monitor.server_url, "http://localhost:8000");
        assert_eq!(config.monitor.user_id, "user123");
        assert_eq!(config.monitor.poll_interval_ms, 500);
        assert_eq!(config.monitor.error_backoff_ms, 1000);
        assert_eq!(config.monitor.request_timeout_secs, 5);
        assert!(!config.monitor.force_polling);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_poll_interval() {
        let mut config = Config::default();
        config.monitor.poll_interval_ms = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.monitor.request_timeout_secs = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("request_timeout_secs"));
    }

    #[test]
    fn test_validate_empty_user_id() {
        let mut config = Config::default();
        config.monitor.user_id = "  ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_host() {
        let mut config = Config::default();
        config.server.host = "not-an-ip".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("listen host"));
    }

    #[test]
    fn test_broadcast_endpoint_strips_trailing_slash() {
        let mut config = Config::default();
        config.monitor.server_url = "http://example.com:8000/".to_string();
        config.monitor.user_id = "alice".to_string();

        assert_eq!(config.broadcast_endpoint(), "http://example.com:8000/alice");
    }

    #[test]
    fn test_durations() {
        let config = Config::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.error_backoff(), Duration::from_millis(1000));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        figment::Jail::expect_with(|_jail| {
            let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
            assert!(result.is_ok());
            assert_eq!(result.unwrap(), Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[monitor]
user_id = "alice"
poll_interval_ms = 250

[server]
port = 9000
"#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("config.toml")))
                .expect("config file loads");
            assert_eq!(config.monitor.user_id, "alice");
            assert_eq!(config.monitor.poll_interval_ms, 250);
            assert_eq!(config.server.port, 9000);
            // Untouched values keep their defaults
            assert_eq!(config.monitor.server_url, "http://localhost:8000");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SPILL_MONITOR__POLL_INTERVAL_MS", "250");
            jail.set_env("SPILL_MONITOR__USER_ID", "bob");
            jail.set_env("SPILL_SERVER__PORT", "9001");

            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .expect("config with env overrides loads");
            assert_eq!(config.monitor.poll_interval_ms, 250);
            assert_eq!(config.monitor.user_id, "bob");
            assert_eq!(config.server.port, 9001);
            // Untouched values keep their defaults
            assert_eq!(config.monitor.error_backoff_ms, 1000);
            assert_eq!(config.server.host, "0.0.0.0");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_beat_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[server]
port = 9000
"#,
            )?;
            jail.set_env("SPILL_SERVER__PORT", "9001");

            let config = Config::load_from(Some(PathBuf::from("config.toml")))
                .expect("config with env overrides loads");
            assert_eq!(config.server.port, 9001);
            Ok(())
        });
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("spill"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_config_serialize_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
