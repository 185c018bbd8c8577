//! Liveness probe for upstream proxies
//!
//! A proxy is usable when a single GET to an IP-echo endpoint succeeds
//! through it within the probe timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tracing::{debug, instrument, warn};

use crate::error::MscoreError;
use crate::models::ProxyEntry;
use crate::proxy::transport::build_client;

/// Decides whether a proxy may carry a service call
#[async_trait]
pub trait ProxyValidator: Send + Sync {
    /// `true` when the proxy answered; any failure is `false`
    async fn check(&self, proxy: &ProxyEntry) -> bool;
}

/// Health checker configuration
#[derive(Clone, Debug)]
pub struct HealthCheckerConfig {
    /// Timeout for each health check
    pub check_timeout: Duration,
    /// URL to use for health checks
    pub check_url: String,
}

impl Default for HealthCheckerConfig {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(5),
            check_url: "https://api.ipify.org".to_string(),
        }
    }
}

/// Probes proxies with one HTTP GET, no retries
#[derive(Clone, Debug, Default)]
pub struct HttpProxyValidator {
    config: HealthCheckerConfig,
}

impl HttpProxyValidator {
    pub fn new(config: HealthCheckerConfig) -> Self {
        Self { config }
    }

    /// Returns the failure reason, if any
    async fn probe(&self, proxy: &ProxyEntry) -> Result<(), MscoreError> {
        let client = build_client(Some(proxy), self.config.check_timeout, HeaderMap::new())?;

        let response = client.get(&self.config.check_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MscoreError::ProxyValidationFailed(format!(
                "{} answered with status {}",
                proxy.redacted(),
                status.as_u16()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ProxyValidator for HttpProxyValidator {
    #[instrument(skip_all, fields(proxy = %proxy))]
    async fn check(&self, proxy: &ProxyEntry) -> bool {
        debug!("Checking proxy against {}", self.config.check_url);

        match self.probe(proxy).await {
            Ok(()) => {
                debug!("Proxy {} is healthy", proxy);
                true
            }
            Err(e) => {
                warn!("Proxy {} is unhealthy: {}", proxy, e);
                false
            }
        }
    }
}
