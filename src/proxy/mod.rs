//! Outbound request plumbing
//!
//! This module provides:
//! - Proxy list loading and random selection
//! - Proxy liveness checks
//! - HTTP transport, direct or through a proxy
//! - Request dispatch with bounded retries

pub mod dispatcher;
pub mod health;
pub mod pool;
pub mod transport;

pub use dispatcher::{DispatcherConfig, RequestDispatcher};
pub use health::{HealthCheckerConfig, HttpProxyValidator, ProxyValidator};
pub use pool::ProxyPool;
pub use transport::{HttpTransport, OutboundRequest, ReqwestTransport};
