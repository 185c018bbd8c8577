//! Environment-driven configuration

use crate::error::{MscoreError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Scoring service configuration
    pub service: ServiceConfig,
    /// Proxy validation configuration
    pub validation: ValidationConfig,
    /// Input and output file locations
    pub files: FilesConfig,
    /// Logging configuration
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the scoring API, without trailing slash
    pub base_url: String,
    /// Public site origin sent as `origin`/`referer`
    pub site_origin: String,
    /// Maximum retry attempts for failed requests
    pub max_retries: u32,
    /// Request timeout in seconds
    pub request_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// IP-echo endpoint used to probe proxies
    pub check_url: String,
    /// Probe timeout in seconds
    pub check_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct FilesConfig {
    pub code: PathBuf,
    pub proxies: PathBuf,
    pub wallets: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            service: ServiceConfig {
                base_url: parse_url("MSCORE_BASE_URL", "https://mscore.onrender.com")?,
                site_origin: parse_url("MSCORE_SITE_ORIGIN", "https://monadscore.xyz")?,
                max_retries: get_env_or("MSCORE_MAX_RETRIES", "3").parse().map_err(|_| {
                    MscoreError::InvalidConfig("MSCORE_MAX_RETRIES must be a valid number".into())
                })?,
                request_timeout: get_env_or("MSCORE_REQUEST_TIMEOUT", "15")
                    .parse()
                    .unwrap_or(15),
            },
            validation: ValidationConfig {
                check_url: parse_url("MSCORE_CHECK_URL", "https://api.ipify.org")?,
                check_timeout: get_env_or("MSCORE_CHECK_TIMEOUT", "5")
                    .parse()
                    .unwrap_or(5),
            },
            files: FilesConfig {
                code: get_env_or("MSCORE_CODE_FILE", "code.txt").into(),
                proxies: get_env_or("MSCORE_PROXIES_FILE", "proxies.txt").into(),
                wallets: get_env_or("MSCORE_WALLETS_FILE", "wallets.json").into(),
            },
            log: LogConfig {
                level: get_env_or("LOG_LEVEL", "info"),
                format: get_env_or("LOG_FORMAT", "pretty"),
            },
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.service.request_timeout.max(1))
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.validation.check_timeout.max(1))
    }
}

/// Read a URL variable, reject anything `Url` cannot parse, and drop a trailing slash
fn parse_url(key: &str, default: &str) -> Result<String> {
    let raw = get_env_or(key, default);
    let raw = raw.trim();

    let url = Url::parse(raw)
        .map_err(|e| MscoreError::InvalidConfig(format!("{} must be a valid URL: {}", key, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(MscoreError::InvalidConfig(format!(
            "{} has unsupported scheme: {}",
            key,
            url.scheme()
        )));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

/// Get environment variable with a default value
fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
