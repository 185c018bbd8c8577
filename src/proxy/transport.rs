//! HTTP transport for calls against the scoring service
//!
//! Builds a client per call, routed through the chosen upstream proxy or
//! connecting directly.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{MscoreError, Result};
use crate::models::ProxyEntry;

/// Desktop browser identity presented to the service
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

/// A single call against the service, built fresh for every dispatch
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub path: String,
    pub body: Value,
}

impl OutboundRequest {
    pub fn new(method: Method, path: impl Into<String>, body: Value) -> Self {
        Self {
            method,
            path: path.into(),
            body,
        }
    }
}

/// Executes one outbound request, optionally through a proxy
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request and return the parsed response body.
    ///
    /// Network errors, timeouts and non-2xx statuses are all `RequestFailed`.
    async fn send(&self, request: &OutboundRequest, proxy: Option<&ProxyEntry>) -> Result<Value>;
}

/// Build a client that routes all traffic through `proxy` when given
pub fn build_client(
    proxy: Option<&ProxyEntry>,
    timeout: Duration,
    headers: HeaderMap,
) -> Result<Client> {
    let mut builder = Client::builder().timeout(timeout).default_headers(headers);

    if let Some(proxy) = proxy {
        let upstream = reqwest::Proxy::all(proxy.url()).map_err(|e| {
            MscoreError::ProxyValidationFailed(format!("{}: {}", proxy.redacted(), e))
        })?;
        builder = builder.proxy(upstream);
    } else {
        builder = builder.no_proxy();
    }

    builder
        .build()
        .map_err(|e| MscoreError::RequestFailed(format!("failed to build HTTP client: {}", e)))
}

/// Fixed headers sent with every service call
pub fn default_headers(site_origin: &str) -> Result<HeaderMap> {
    let origin = site_origin.trim_end_matches('/');
    let header = |value: String| {
        HeaderValue::from_str(&value).map_err(|_| {
            MscoreError::InvalidConfig(format!("invalid header value: {}", value))
        })
    };

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(HeaderName::from_static("origin"), header(origin.to_string())?);
    headers.insert(
        HeaderName::from_static("referer"),
        header(format!("{}/", origin))?,
    );
    Ok(headers)
}

/// Decode a response body, falling back to a JSON string for non-JSON payloads
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// reqwest-backed transport against a fixed base URL
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, site_origin: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: default_headers(site_origin)?,
            timeout,
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: &OutboundRequest, proxy: Option<&ProxyEntry>) -> Result<Value> {
        // A proxy URL reqwest refuses is a failed call, not a free skip.
        let client = build_client(proxy, self.timeout, self.headers.clone()).map_err(|e| match e {
            MscoreError::ProxyValidationFailed(msg) => MscoreError::RequestFailed(msg),
            other => other,
        })?;

        let url = self.endpoint(&request.path);
        debug!(
            "{} {} via {}",
            request.method,
            url,
            proxy.map(|p| p.redacted()).unwrap_or_else(|| "direct".to_string())
        );

        let response = client
            .request(request.method.clone(), &url)
            .json(&request.body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MscoreError::RequestFailed(format!(
                "Request failed with status code {}",
                status.as_u16()
            )));
        }

        let text = response.text().await?;
        Ok(parse_body(&text))
    }
}
