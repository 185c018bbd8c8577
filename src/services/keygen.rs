//! Wallet key generation

use alloy_signer_local::PrivateKeySigner;

use crate::error::Result;

/// Fresh key material, not yet onboarded
#[derive(Debug, Clone)]
pub struct GeneratedWallet {
    /// EIP-55 checksummed address
    pub address: String,
    /// `0x`-prefixed hex secret key
    pub private_key: String,
}

pub trait WalletGenerator: Send + Sync {
    fn generate(&self) -> Result<GeneratedWallet>;
}

/// Random secp256k1 wallets
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomWalletGenerator;

impl WalletGenerator for RandomWalletGenerator {
    fn generate(&self) -> Result<GeneratedWallet> {
        let signer = PrivateKeySigner::random();

        Ok(GeneratedWallet {
            address: signer.address().to_checksum(None),
            private_key: format!("0x{}", hex::encode(signer.credential().to_bytes())),
        })
    }
}
