//! Mscore - Monad Score wallet onboarding
//!
//! Creates wallets in bulk and registers them with the Monad Score service.
//!
//! ## Features
//!
//! - Random EVM wallet generation
//! - Registration under a referral code, then node activation
//! - HTTP, SOCKS4 and SOCKS5 proxy rotation with liveness checks
//! - Bounded retries that never spend budget on dead proxies
//! - Incremental `wallets.json` persistence

pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod repository;
pub mod services;

pub use config::Config;
pub use error::{MscoreError, Result};
