//! Progress notifications for a run
//!
//! The controller reports every stage; what happens with the events is up
//! to the reporter. [`NoopProgress`] is the default.

use tracing::{info, warn};

use crate::error::MscoreError;
use crate::models::{shorten_address, RunStats};

#[derive(Debug)]
pub enum ProgressEvent<'a> {
    WalletStarted {
        index: u32,
        total: u32,
        address: &'a str,
    },
    Registered,
    Activated,
    Saved,
    WalletFailed {
        error: &'a MscoreError,
    },
    WalletFinished {
        stats: RunStats,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &ProgressEvent<'_>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: &ProgressEvent<'_>) {}
}

/// Writes each event as a log line
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: &ProgressEvent<'_>) {
        match event {
            ProgressEvent::WalletStarted {
                index,
                total,
                address,
            } => info!(
                "Processing wallet {}/{} ({})",
                index,
                total,
                shorten_address(address)
            ),
            ProgressEvent::Registered => info!("Registration successful"),
            ProgressEvent::Activated => info!("Node activated"),
            ProgressEvent::Saved => info!("Wallet saved"),
            ProgressEvent::WalletFailed { error } => warn!("{}", error),
            ProgressEvent::WalletFinished { stats } => info!(
                "Progress: {} succeeded, {} failed",
                stats.success, stats.failed
            ),
        }
    }
}
