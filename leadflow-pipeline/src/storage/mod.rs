//! Key-value storage behind the persistence commands
//!
//! The engine stores whole collections under a handful of fixed keys. A
//! backend only has to get, set and remove string values and append lines to
//! a log; everything above that (serialization, seeding, latency) lives in
//! [`PipelineContext`](crate::context::PipelineContext).

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::error::Result;
use async_trait::async_trait;

/// Key holding the JSON array of leads
pub const LEADS_KEY: &str = "leads_data";

/// Key holding the JSON array of columns
pub const COLUMNS_KEY: &str = "leads_columns";

/// Key holding the JSONL operation log
pub const ACTIVITY_KEY: &str = "activity_log";

/// Key holding the JSONL operation log of a single lead
pub fn lead_log_key(lead_id: &str) -> String {
    format!("lead_log_{lead_id}")
}

/// Durable string store addressed by key
#[async_trait]
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Read a value, `None` when the key was never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;

    /// Append one line to the log stored under `key`
    async fn append(&self, key: &str, line: &str) -> Result<()>;

    /// Read every line appended under `key`, oldest first
    async fn lines(&self, key: &str) -> Result<Vec<String>>;

    /// Take an exclusive lock for a read-modify-write sequence
    async fn lock(&self) -> Result<StorageLock>;
}

/// RAII lock guard - releases on drop
#[derive(Debug)]
pub struct StorageLock {
    file: Option<std::fs::File>,
}

impl StorageLock {
    /// A guard that holds nothing, for backends without cross-process state
    pub fn unguarded() -> Self {
        Self { file: None }
    }

    pub(crate) fn file(file: std::fs::File) -> Self {
        Self { file: Some(file) }
    }
}

impl Drop for StorageLock {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            let _ = fs2::FileExt::unlock(file);
        }
    }
}
