//! Configuration management
//!
//! TOML configuration with zero-config defaults. Every field has a default
//! matching the constants module, so an absent file and an empty file both
//! yield a working configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::client::ClientConfig;
use crate::app::payment::{PaymentConfig, TimeoutNotice};
use crate::constants::{api, http, limits, payment, search};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Checkout polling settings
    pub payment: PaymentConfigToml,
    /// Search and pagination settings
    pub search: SearchConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Base URL of the backend API
    pub base_url: String,
    /// TCP keep-alive timeout in seconds (None = disabled)
    pub tcp_keepalive_secs: Option<u64>,
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout in seconds (None = no timeout)
    pub pool_idle_timeout_secs: Option<u64>,
    /// Maximum connections per host
    pub pool_max_per_host: usize,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            base_url: api::DEFAULT_BASE_URL.to_string(),
            tcp_keepalive_secs: Some(30),
            tcp_nodelay: true,
            pool_idle_timeout_secs: Some(http::POOL_IDLE_TIMEOUT.as_secs()),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

/// TOML-friendly checkout configuration
///
/// Durations accept humantime strings ("3s", "5m").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfigToml {
    /// Interval between order-status polls
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Hard ceiling on how long a session keeps polling
    #[serde(with = "humantime_serde")]
    pub poll_timeout: Duration,
    /// Whether polling expiry is surfaced to the host
    pub timeout_notice: TimeoutNotice,
}

impl Default for PaymentConfigToml {
    fn default() -> Self {
        Self {
            poll_interval: payment::POLL_INTERVAL,
            poll_timeout: payment::POLL_TIMEOUT,
            timeout_notice: TimeoutNotice::Surfaced,
        }
    }
}

/// TOML-friendly search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfigToml {
    /// Results per page
    pub page_size: u32,
    /// Width of the pagination window
    pub max_pages_to_show: u32,
}

impl Default for SearchConfigToml {
    fn default() -> Self {
        Self {
            page_size: search::PAGE_SIZE,
            max_pages_to_show: search::MAX_PAGES_TO_SHOW,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
    /// Enable colored output
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            colored_output: true,
        }
    }
}

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    /// 3. Environment variables (applied by `ClientConfig::from_env`)
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        let config = match config_path {
            Some(path) => {
                debug!("loading config from: {}", path.display());
                Self::load_from_file(&path).await?
            }
            None => {
                debug!("no config file found; using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let search_paths = [
            PathBuf::from("./entlookup.toml"),
            PathBuf::from("./config.toml"),
        ];
        search_paths.into_iter().find(|path| path.exists())
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;
        info!("loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Reject values that would misbehave at runtime
    fn validate(&self) -> ConfigResult<()> {
        if self.search.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.page_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.search.max_pages_to_show == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.max_pages_to_show".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.payment.poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "payment.poll_interval".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }
        if self.payment.poll_timeout < self.payment.poll_interval {
            return Err(ConfigError::InvalidValue {
                field: "payment.poll_timeout".to_string(),
                reason: "must be at least one poll interval".to_string(),
            });
        }
        if self.client.rate_limit_rps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.rate_limit_rps".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// Convert to the runtime client configuration
    ///
    /// Environment variables win over the file for base URL and token.
    pub fn client_config(&self) -> ClientConfig {
        let env = ClientConfig::from_env();
        ClientConfig {
            base_url: if env.base_url == api::DEFAULT_BASE_URL {
                self.client.base_url.clone()
            } else {
                env.base_url
            },
            token: env.token,
            tcp_keepalive: self.client.tcp_keepalive_secs.map(Duration::from_secs),
            tcp_nodelay: self.client.tcp_nodelay,
            pool_idle_timeout: self.client.pool_idle_timeout_secs.map(Duration::from_secs),
            pool_max_per_host: self.client.pool_max_per_host,
            request_timeout: Duration::from_secs(self.client.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.client.connect_timeout_secs),
            rate_limit_rps: self.client.rate_limit_rps,
        }
    }

    /// Convert to the runtime payment configuration
    pub fn payment_config(&self) -> PaymentConfig {
        PaymentConfig {
            poll_interval: self.payment.poll_interval,
            poll_timeout: self.payment.poll_timeout,
            timeout_notice: self.payment.timeout_notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.client.rate_limit_rps, limits::DEFAULT_RATE_LIMIT_RPS);
        assert_eq!(config.payment.poll_interval, payment::POLL_INTERVAL);
        assert_eq!(config.search.page_size, search::PAGE_SIZE);
        assert_eq!(config.logging.level, "info");
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.search.page_size, search::PAGE_SIZE);
        assert_eq!(config.payment.timeout_notice, TimeoutNotice::Surfaced);
    }

    #[test]
    fn test_humantime_durations_parse() {
        let config: AppConfig = toml::from_str(
            r#"
            [payment]
            poll_interval = "5s"
            poll_timeout = "10m"
            timeout_notice = "silent"
            "#,
        )
        .unwrap();
        assert_eq!(config.payment.poll_interval, Duration::from_secs(5));
        assert_eq!(config.payment.poll_timeout, Duration::from_secs(600));
        assert_eq!(config.payment.timeout_notice, TimeoutNotice::Silent);
    }

    #[test]
    fn test_validation_rejects_zero_page_size() {
        let config: AppConfig = toml::from_str(
            r#"
            [search]
            page_size = 0
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_timeout_below_interval() {
        let config: AppConfig = toml::from_str(
            r#"
            [payment]
            poll_interval = "10s"
            poll_timeout = "5s"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_missing_explicit_file_fails() {
        let result = AppConfig::load(Some(PathBuf::from("./does-not-exist.toml"))).await;
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }
}
