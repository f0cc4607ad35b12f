//! DeleteColumn command

use crate::context::PipelineContext;
use crate::defaults::MIN_COLUMNS;
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use crate::types::{renumber, ColumnId};
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Delete a column and move its leads to the first remaining column
#[operation(
    verb = "delete",
    noun = "column",
    description = "Delete a column, re-pointing its leads to the first column"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteColumn {
    /// The column ID to delete
    pub id: ColumnId,
}

impl DeleteColumn {
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self { id: id.into() }
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::COLUMN_WRITE).await;

        let _lock = ctx.lock().await?;
        let mut columns = ctx.read_columns().await?;
        if !columns.iter().any(|c| c.id == self.id) {
            return Err(PipelineError::ColumnNotFound {
                id: self.id.to_string(),
            });
        }
        if columns.len() <= MIN_COLUMNS {
            return Err(PipelineError::capacity("cannot delete the last column"));
        }

        columns.retain(|c| c.id != self.id);
        renumber(&mut columns);
        let target = columns[0].id.clone();

        // leads first: the target exists in both the old and the new layout
        let mut leads = ctx.read_leads().await?;
        let mut repointed = Vec::new();
        for lead in leads.iter_mut().filter(|lead| lead.status == self.id) {
            lead.status = target.clone();
            lead.log_status_change(&self.id, &target);
            lead.updated_at = chrono::Utc::now();
            repointed.push(lead.id.clone());
        }
        if !repointed.is_empty() {
            ctx.write_leads(&leads).await?;
        }
        ctx.write_columns(&columns).await?;

        tracing::debug!(id = %self.id, %target, moved = repointed.len(), "column deleted");
        Ok(json!({
            "id": self.id,
            "target": target,
            "repointed": repointed,
        }))
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for DeleteColumn {
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
        result["repointed"]
            .as_array()
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| id.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
