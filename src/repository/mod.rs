pub mod inputs;
pub mod wallet;

pub use inputs::{load_proxy_pool, load_referral_code};
pub use wallet::WalletRepository;
