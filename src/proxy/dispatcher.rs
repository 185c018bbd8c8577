//! Request dispatch with proxy rotation and bounded retries
//!
//! Each logical request runs a small state machine:
//!
//! ```text
//! Select ──► Validate ──► Execute ──► done
//!   ▲  │         │           │
//!   │  └─────────┴───────────┘ (retry)
//! ```
//!
//! Proxy probes are free. Only calls that reach the service consume the
//! retry budget, so at most `max_retries + 1` calls are made per request
//! no matter how many dead proxies the pool holds.

use std::collections::HashSet;
use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::{MscoreError, Result};
use crate::models::ProxyEntry;
use crate::proxy::health::ProxyValidator;
use crate::proxy::pool::ProxyPool;
use crate::proxy::transport::{HttpTransport, OutboundRequest};

/// Configuration for the dispatcher
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

/// Where the state machine goes next
enum Step<'a> {
    Select,
    Validate(&'a ProxyEntry),
    Execute(Option<&'a ProxyEntry>),
}

/// State for one logical request, dropped when dispatch returns
#[derive(Debug, Default)]
struct RetrySession {
    /// Budgeted attempts already spent; never exceeds `max_retries`
    retries_used: u32,
    /// Proxies probed since the last call against the service
    proxies_tried_this_attempt: u32,
    /// Proxy URLs already picked in this session
    excluded: HashSet<String>,
}

impl RetrySession {
    fn is_excluded(&self, proxy: &ProxyEntry) -> bool {
        self.excluded.contains(&proxy.url())
    }

    fn exclude(&mut self, proxy: &ProxyEntry) {
        self.excluded.insert(proxy.url());
        self.proxies_tried_this_attempt += 1;
    }

    fn all_excluded(&self, pool: &ProxyPool) -> bool {
        pool.entries().iter().all(|p| self.is_excluded(p))
    }
}

/// Sends service calls through the proxy pool with bounded retries
pub struct RequestDispatcher {
    pool: Arc<ProxyPool>,
    validator: Arc<dyn ProxyValidator>,
    transport: Arc<dyn HttpTransport>,
    config: DispatcherConfig,
}

impl RequestDispatcher {
    pub fn new(
        pool: Arc<ProxyPool>,
        validator: Arc<dyn ProxyValidator>,
        transport: Arc<dyn HttpTransport>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            pool,
            validator,
            transport,
            config,
        }
    }

    /// Dispatch one logical request.
    ///
    /// Returns the parsed response body of the first successful call, or
    /// `ExhaustedRetries` carrying the last failure once the budget is spent.
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn dispatch(&self, method: Method, path: &str, body: Value) -> Result<Value> {
        let request = OutboundRequest::new(method, path, body);
        let max_retries = self.config.max_retries;
        let mut session = RetrySession::default();
        let mut step = Step::Select;

        loop {
            step = match step {
                Step::Select => self.select(&session),

                Step::Validate(proxy) => {
                    session.exclude(proxy);
                    if self.validator.check(proxy).await {
                        Step::Execute(Some(proxy))
                    } else {
                        let err = MscoreError::ProxyValidationFailed(proxy.redacted());
                        warn!("{} - skipping", err);
                        Step::Select
                    }
                }

                Step::Execute(proxy) => {
                    debug!(
                        "Sending request (retry {}/{}, {} proxies probed)",
                        session.retries_used, max_retries, session.proxies_tried_this_attempt
                    );

                    match self.transport.send(&request, proxy).await {
                        Ok(body) => return Ok(body),
                        Err(e) if session.retries_used >= max_retries => {
                            warn!("Giving up after {} retries: {}", max_retries, e);
                            return Err(MscoreError::ExhaustedRetries {
                                retries: max_retries,
                                message: e.to_string(),
                            });
                        }
                        Err(e) => {
                            session.retries_used += 1;
                            session.proxies_tried_this_attempt = 0;
                            warn!(
                                "Request via {} failed: {} (retry {}/{})",
                                proxy.map(|p| p.redacted()).unwrap_or_else(|| "direct".into()),
                                e,
                                session.retries_used,
                                max_retries
                            );
                            Step::Select
                        }
                    }
                }
            };
        }
    }

    /// Pick the next untried proxy, or go direct when none is left
    fn select(&self, session: &RetrySession) -> Step<'_> {
        if self.pool.is_empty() {
            return Step::Execute(None);
        }
        if session.all_excluded(&self.pool) {
            info!("All {} proxies tried for this request, going direct", self.pool.len());
            return Step::Execute(None);
        }

        // Redraw on already-tried proxies; at least one untried entry remains.
        loop {
            match self.pool.pick_random() {
                Some(proxy) if session.is_excluded(proxy) => continue,
                Some(proxy) => return Step::Validate(proxy),
                None => return Step::Execute(None),
            }
        }
    }
}
