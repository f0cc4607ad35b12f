//! Pipeline operation processor
//!
//! Runs commands against a [`PipelineContext`] and writes their audit entries
//! to the global activity log plus the log of every lead they touched.

use crate::context::PipelineContext;
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use leadflow_operations::{LogEntry, OperationProcessor};

/// Processor for pipeline commands
#[derive(Debug, Clone, Default)]
pub struct PipelineOperationProcessor {
    actor: Option<String>,
}

impl PipelineOperationProcessor {
    /// Create a processor that records no actor
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every entry with the given actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

#[async_trait]
impl OperationProcessor<PipelineContext, PipelineError> for PipelineOperationProcessor {
    fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    async fn write_log(
        &self,
        ctx: &PipelineContext,
        entry: &LogEntry,
        affected: &[String],
    ) -> Result<()> {
        ctx.append_activity(entry).await?;
        for id in affected {
            ctx.append_lead_log(id, entry).await?;
        }
        tracing::debug!(op = %entry.op, affected = affected.len(), "audit entry written");
        Ok(())
    }
}
