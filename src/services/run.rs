//! Sequential onboarding run
//!
//! Wallets are handled strictly one after another. A wallet that fails at
//! any stage is counted and skipped; only bad input or an unreadable
//! `wallets.json` stops the run.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{MscoreError, Result};
use crate::models::{RunStats, Wallet};
use crate::repository::WalletRepository;
use crate::services::keygen::{GeneratedWallet, WalletGenerator};
use crate::services::onboarding::WalletOnboarding;
use crate::services::progress::{NoopProgress, ProgressEvent, ProgressReporter};

/// Parse the operator's wallet count; anything but a positive integer is rejected
pub fn parse_wallet_count(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    match trimmed.parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(MscoreError::InvalidWalletCount(trimmed.to_string())),
    }
}

/// Mutable state of one run
#[derive(Debug, Default)]
pub struct RunState {
    pub stats: RunStats,
    /// Every wallet in `wallets.json`, pre-existing ones first
    pub wallets: Vec<Wallet>,
}

/// Outcome reported once the run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub stats: RunStats,
    /// Wallets persisted in `wallets.json` after the run
    pub saved: usize,
}

pub struct RunController {
    onboarding: WalletOnboarding,
    generator: Arc<dyn WalletGenerator>,
    repository: WalletRepository,
    progress: Arc<dyn ProgressReporter>,
}

impl RunController {
    pub fn new(
        onboarding: WalletOnboarding,
        generator: Arc<dyn WalletGenerator>,
        repository: WalletRepository,
    ) -> Self {
        Self {
            onboarding,
            generator,
            repository,
            progress: Arc::new(NoopProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Create and onboard `count` wallets
    #[instrument(skip(self))]
    pub async fn run(&self, count: u32) -> Result<RunReport> {
        if count == 0 {
            return Err(MscoreError::InvalidWalletCount(count.to_string()));
        }

        let mut state = RunState {
            stats: RunStats::default(),
            wallets: self.repository.load().await?,
        };
        if !state.wallets.is_empty() {
            info!("Loaded {} existing wallets", state.wallets.len());
        }

        for index in 1..=count {
            match self.process_wallet(&mut state, index, count).await {
                Ok(()) => state.stats.record_success(),
                Err(e) => {
                    warn!("Wallet {}/{} failed: {}", index, count, e);
                    self.progress
                        .report(&ProgressEvent::WalletFailed { error: &e });
                    state.stats.record_failure();
                }
            }

            self.progress.report(&ProgressEvent::WalletFinished {
                stats: state.stats,
            });
        }

        Ok(RunReport {
            stats: state.stats,
            saved: state.wallets.len(),
        })
    }

    /// Generate, onboard and persist one wallet.
    ///
    /// On error the in-memory list is left as it was before the call.
    async fn process_wallet(&self, state: &mut RunState, index: u32, total: u32) -> Result<()> {
        let GeneratedWallet {
            address,
            private_key,
        } = self.generator.generate()?;

        self.progress.report(&ProgressEvent::WalletStarted {
            index,
            total,
            address: &address,
        });

        self.onboarding
            .onboard_reporting(&address, self.progress.as_ref())
            .await?;

        state.wallets.push(Wallet::new(address, private_key));
        if let Err(e) = self.repository.save_all(&state.wallets).await {
            state.wallets.pop();
            return Err(e);
        }
        self.progress.report(&ProgressEvent::Saved);

        Ok(())
    }
}
