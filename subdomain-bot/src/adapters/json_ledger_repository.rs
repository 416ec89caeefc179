//! JSON file-based ledger repository
//!
//! The whole ledger is a single pretty-printed JSON object keyed by user ID.
//! Writes go to a sibling temp file first and are then renamed over the
//! original, so a crash mid-write never leaves a truncated ledger behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use subdomain_bot_core::error::{CoreError, CoreResult};
use subdomain_bot_core::traits::LedgerRepository;
use subdomain_bot_core::types::Ledger;

const MAX_LEDGER_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Ledger repository backed by a JSON file on disk.
pub struct JsonLedgerRepository {
    path: PathBuf,
}

impl JsonLedgerRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl LedgerRepository for JsonLedgerRepository {
    async fn load(&self) -> CoreResult<Option<Ledger>> {
        if !tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to access ledger file: {e}")))?
        {
            log::debug!("Ledger file does not exist: {}", self.path.display());
            return Ok(None);
        }

        let metadata = tokio::fs::metadata(&self.path).await.map_err(|e| {
            CoreError::StorageError(format!("Failed to read ledger file metadata: {e}"))
        })?;
        if metadata.len() > MAX_LEDGER_FILE_SIZE {
            return Err(CoreError::StorageError(format!(
                "Ledger file too large: {} bytes (max: {MAX_LEDGER_FILE_SIZE} bytes)",
                metadata.len()
            )));
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to read ledger file: {e}")))?;

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| CoreError::SerializationError(format!("Invalid ledger format: {e}")))
    }

    async fn save(&self, ledger: &Ledger) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(ledger)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CoreError::StorageError(format!("Failed to create ledger directory: {e}"))
            })?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to write ledger file: {e}")))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to replace ledger file: {e}")))?;

        log::debug!("Ledger saved to {}", self.path.display());
        Ok(())
    }
}
