//! In-process storage, used by tests and embedders without a disk

use super::{StorageBackend, StorageLock};
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Map-backed storage
///
/// Writes can be switched off with [`set_read_only`](Self::set_read_only),
/// after which every mutation fails with [`PipelineError::ReadOnly`] and the
/// stored data stays as it was.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, String>>,
    logs: Mutex<HashMap<String, Vec<String>>>,
    read_only: AtomicBool,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject (or accept again) all writes
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(PipelineError::ReadOnly);
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.values.lock().await.remove(key);
        self.logs.lock().await.remove(key);
        Ok(())
    }

    async fn append(&self, key: &str, line: &str) -> Result<()> {
        self.check_writable()?;
        self.logs
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .push(line.to_string());
        Ok(())
    }

    async fn lines(&self, key: &str) -> Result<Vec<String>> {
        Ok(self.logs.lock().await.get(key).cloned().unwrap_or_default())
    }

    async fn lock(&self) -> Result<StorageLock> {
        Ok(StorageLock::unguarded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip() {
        let backend = MemoryBackend::new();
        backend.set("leads_data", "[]").await.unwrap();
        assert_eq!(backend.get("leads_data").await.unwrap().as_deref(), Some("[]"));

        backend.remove("leads_data").await.unwrap();
        assert!(backend.get("leads_data").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_only_rejects_writes() {
        let backend = MemoryBackend::new();
        backend.set("leads_data", "[1]").await.unwrap();
        backend.set_read_only(true);

        assert!(matches!(
            backend.set("leads_data", "[]").await,
            Err(PipelineError::ReadOnly)
        ));
        assert!(matches!(
            backend.append("activity_log", "{}").await,
            Err(PipelineError::ReadOnly)
        ));
        // Reads still work and see the old value
        assert_eq!(backend.get("leads_data").await.unwrap().as_deref(), Some("[1]"));

        backend.set_read_only(false);
        backend.set("leads_data", "[]").await.unwrap();
    }
}
