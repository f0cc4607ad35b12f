//! PipelineContext - I/O primitives for pipeline storage
//!
//! The context wraps a storage backend with typed reads and writes of the two
//! collections and the audit log. No business logic methods, just data access
//! primitives. Commands do all the work.

use crate::defaults::default_columns;
use crate::error::Result;
use crate::latency::Latency;
use crate::storage::{
    lead_log_key, FileBackend, MemoryBackend, StorageBackend, StorageLock, ACTIVITY_KEY,
    COLUMNS_KEY, LEADS_KEY,
};
use crate::types::{Column, Lead, LeadId};
use leadflow_config::PipelineConfig;
use leadflow_operations::LogEntry;
use std::sync::Arc;

/// Context passed to every command - provides access, not logic
#[derive(Debug, Clone)]
pub struct PipelineContext {
    backend: Arc<dyn StorageBackend>,
    latency: Latency,
}

impl PipelineContext {
    /// Create a context over the given backend with nominal latency
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            latency: Latency::Nominal,
        }
    }

    /// Context over a fresh in-memory store without simulated latency
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new())).with_latency(Latency::None)
    }

    /// Context as described by a loaded configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(Arc::new(FileBackend::new(&config.data_dir)))
            .with_latency(Latency::from(&config.latency))
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    /// Wait as long as a remote call with the given nominal latency would
    pub async fn simulate_latency(&self, nominal_ms: u64) {
        self.latency.simulate(nominal_ms).await;
    }

    // =========================================================================
    // Lead I/O
    // =========================================================================

    /// Read every stored lead; an empty store holds no leads
    pub async fn read_leads(&self) -> Result<Vec<Lead>> {
        match self.backend.get(LEADS_KEY).await? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the stored leads
    pub async fn write_leads(&self, leads: &[Lead]) -> Result<()> {
        let content = serde_json::to_string_pretty(leads)?;
        self.backend.set(LEADS_KEY, &content).await
    }

    /// Find one lead by id
    pub async fn find_lead(&self, id: &LeadId) -> Result<Option<Lead>> {
        Ok(self
            .read_leads()
            .await?
            .into_iter()
            .find(|lead| lead.id == *id))
    }

    // =========================================================================
    // Column I/O
    // =========================================================================

    /// Read the columns sorted by order
    ///
    /// A store without columns (never written, or holding an empty array)
    /// reads as the default stages, so a board always has at least one.
    pub async fn read_columns(&self) -> Result<Vec<Column>> {
        let mut columns: Vec<Column> = match self.backend.get(COLUMNS_KEY).await? {
            Some(content) => serde_json::from_str(&content)?,
            None => Vec::new(),
        };
        if columns.is_empty() {
            return Ok(default_columns());
        }
        columns.sort_by_key(|c| c.order);
        Ok(columns)
    }

    /// Replace the stored columns
    pub async fn write_columns(&self, columns: &[Column]) -> Result<()> {
        let content = serde_json::to_string_pretty(columns)?;
        self.backend.set(COLUMNS_KEY, &content).await
    }

    /// Forget both collections
    pub async fn clear(&self) -> Result<()> {
        self.backend.remove(LEADS_KEY).await?;
        self.backend.remove(COLUMNS_KEY).await
    }

    // =========================================================================
    // Activity logging
    // =========================================================================

    /// Append a log entry to the global activity log
    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        let line = serde_json::to_string(entry)?;
        self.backend.append(ACTIVITY_KEY, &line).await
    }

    /// Append a log entry to a lead's own log
    pub async fn append_lead_log(&self, lead_id: &str, entry: &LogEntry) -> Result<()> {
        let line = serde_json::to_string(entry)?;
        self.backend.append(&lead_log_key(lead_id), &line).await
    }

    /// Read activity log entries, newest first
    pub async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        read_log(self.backend.as_ref(), ACTIVITY_KEY, limit).await
    }

    /// Read a lead's log entries, newest first
    pub async fn read_lead_log(&self, lead_id: &LeadId) -> Result<Vec<LogEntry>> {
        read_log(self.backend.as_ref(), &lead_log_key(lead_id.as_str()), None).await
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Take the store's exclusive lock (non-blocking)
    pub async fn lock(&self) -> Result<StorageLock> {
        self.backend.lock().await
    }
}

async fn read_log(
    backend: &dyn StorageBackend,
    key: &str,
    limit: Option<usize>,
) -> Result<Vec<LogEntry>> {
    let mut entries: Vec<LogEntry> = backend
        .lines(key)
        .await?
        .iter()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();

    entries.reverse();
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    Ok(entries)
}
