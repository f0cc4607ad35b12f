//! UpdateColumn command

use crate::context::PipelineContext;
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use crate::types::validate_title;
use crate::types::{ColumnId, ColumnPatch};
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rename or recolor a column; its position never changes here
#[operation(verb = "update", noun = "column", description = "Update a column's title or color")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateColumn {
    /// The column ID to update
    pub id: ColumnId,
    /// New title and/or color
    pub patch: ColumnPatch,
}

impl UpdateColumn {
    pub fn new(id: impl Into<ColumnId>, patch: ColumnPatch) -> Self {
        Self {
            id: id.into(),
            patch,
        }
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::COLUMN_WRITE).await;
        if let Some(title) = &self.patch.title {
            validate_title(title)?;
        }

        let _lock = ctx.lock().await?;
        let mut columns = ctx.read_columns().await?;
        let column = columns
            .iter_mut()
            .find(|c| c.id == self.id)
            .ok_or_else(|| PipelineError::ColumnNotFound {
                id: self.id.to_string(),
            })?;

        if let Some(title) = &self.patch.title {
            column.title = title.trim().to_string();
        }
        if let Some(color) = &self.patch.color {
            column.color = Some(color.clone());
        }
        let column = column.clone();

        ctx.write_columns(&columns).await?;
        Ok(serde_json::to_value(&column)?)
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for UpdateColumn {
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
}
