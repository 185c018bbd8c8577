//! Wallet onboarding services

pub mod keygen;
pub mod onboarding;
pub mod progress;
pub mod run;

pub use keygen::{GeneratedWallet, RandomWalletGenerator, WalletGenerator};
pub use onboarding::{Onboarded, WalletOnboarding};
pub use progress::{LogProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use run::{parse_wallet_count, RunController, RunReport, RunState};
