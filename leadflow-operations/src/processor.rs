//! Operation processor: execute a command, then record its audit entry

use crate::{Execute, LogEntry};
use async_trait::async_trait;
use serde_json::Value;

/// Runs commands and persists their log entries.
///
/// Implementors only decide where entries go; `process` drives the flow.
/// A failure to write the audit log never turns a successful command into
/// an error, the entry is dropped with a warning instead.
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
    E: std::fmt::Display + Send,
{
    /// Actor stamped on every entry this processor writes
    fn actor(&self) -> Option<&str>;

    /// Persist a log entry for the given affected resource ids
    async fn write_log(&self, ctx: &C, entry: &LogEntry, affected: &[String]) -> Result<(), E>;

    /// Execute the operation and log it when it asks to be logged
    async fn process<O>(&self, operation: &O, ctx: &C) -> Result<Value, E>
    where
        O: Execute<C, E>,
    {
        let result = operation.execute(ctx).await;
        let (result, entry) = result.split();

        if let Some(mut entry) = entry {
            if let Some(actor) = self.actor() {
                entry = entry.with_actor(actor);
            }
            let affected = match &result {
                Ok(value) => operation.affected_resource_ids(value),
                Err(_) => Vec::new(),
            };
            if let Err(error) = self.write_log(ctx, &entry, &affected).await {
                tracing::warn!(op = %entry.op, %error, "failed to write audit log entry");
            }
        }

        result
    }
}
