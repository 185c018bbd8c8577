//! `wallets.json` persistence

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::Result;
use crate::models::Wallet;

/// Stores the full wallet list as a pretty-printed JSON array
#[derive(Debug, Clone)]
pub struct WalletRepository {
    path: PathBuf,
}

impl WalletRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read previously saved wallets; a missing file is an empty list
    pub async fn load(&self) -> Result<Vec<Wallet>> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path).await?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    /// Rewrite the file with the complete list.
    ///
    /// Writes a sibling temp file and renames it over the target, so readers
    /// never see a half-written array.
    pub async fn save_all(&self, wallets: &[Wallet]) -> Result<()> {
        let json = serde_json::to_string_pretty(wallets)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!("Saved {} wallets to {}", wallets.len(), self.path.display());
        Ok(())
    }
}
