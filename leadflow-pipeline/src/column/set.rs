//! SetColumns command

use super::check_layout;
use crate::context::PipelineContext;
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use crate::types::Column;
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Replace the whole column layout in one write
///
/// Used for reordering. A column that still holds leads cannot be dropped
/// this way; delete it with `DeleteColumn` so its leads are re-pointed.
#[operation(verb = "set", noun = "columns", description = "Replace all columns at once")]
#[derive(Debug, Deserialize, Serialize)]
pub struct SetColumns {
    /// The complete new layout
    pub columns: Vec<Column>,
}

impl SetColumns {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::COLUMN_WRITE).await;
        check_layout(&self.columns)?;

        let _lock = ctx.lock().await?;
        let leads = ctx.read_leads().await?;
        if let Some(orphan) = leads
            .iter()
            .find(|lead| !self.columns.iter().any(|c| c.id == lead.status))
        {
            return Err(PipelineError::validation(
                "columns",
                format!("column {} still holds leads", orphan.status),
            ));
        }

        let mut columns = self.columns.clone();
        columns.sort_by_key(|c| c.order);
        ctx.write_columns(&columns).await?;

        Ok(serde_json::to_value(&columns)?)
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for SetColumns {
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
