//! UpdateLead command

use super::{ensure_column, result_id};
use crate::context::PipelineContext;
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use crate::types::{LeadId, LeadPatch};
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Merge a partial update into a lead
///
/// Moving a lead to another column is an update of its status; the move is
/// recorded in the lead's history exactly once.
#[operation(verb = "update", noun = "lead", description = "Update fields of a lead")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateLead {
    /// The lead ID to update
    pub id: LeadId,
    /// Fields to change
    pub patch: LeadPatch,
}

impl UpdateLead {
    pub fn new(id: impl Into<LeadId>, patch: LeadPatch) -> Self {
        Self {
            id: id.into(),
            patch,
        }
    }

    /// Update that only moves the lead to another column
    pub fn move_to(id: impl Into<LeadId>, status: impl Into<crate::types::ColumnId>) -> Self {
        Self::new(id, LeadPatch::status(status))
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::UPDATE_LEAD).await;

        let _lock = ctx.lock().await?;
        let mut leads = ctx.read_leads().await?;
        let lead = leads
            .iter_mut()
            .find(|lead| lead.id == self.id)
            .ok_or_else(|| PipelineError::LeadNotFound {
                id: self.id.to_string(),
            })?;

        if let Some(status) = &self.patch.status {
            let columns = ctx.read_columns().await?;
            ensure_column(&columns, status)?;
        }

        let mut updated = lead.clone();
        let previous = updated.apply(&self.patch);
        updated.validate()?;
        if let Some(previous) = previous {
            let current = updated.status.clone();
            updated.log_status_change(&previous, &current);
            tracing::debug!(id = %updated.id, from = %previous, to = %current, "lead moved");
        }

        *lead = updated.clone();
        ctx.write_leads(&leads).await?;
        Ok(serde_json::to_value(&updated)?)
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for UpdateLead {
    async fn execute(&self, ctx: &PipelineContext) -> ExecutionResult<Value, PipelineError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        let result = self.run(ctx).await;
        ExecutionResult::logged(
            self.op_string(),
            input,
            result,
            start.elapsed().as_millis() as u64,
        )
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        result_id(result)
    }
}
