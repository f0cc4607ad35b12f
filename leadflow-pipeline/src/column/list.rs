//! ListColumns command

use crate::context::PipelineContext;
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List the columns in display order
#[operation(verb = "list", noun = "columns", description = "List all columns ordered by position")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListColumns;

impl ListColumns {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::FETCH_COLUMNS).await;
        let columns = ctx.read_columns().await?;
        Ok(serde_json::to_value(&columns)?)
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for ListColumns {
    async fn execute(&self, ctx: &PipelineContext) -> ExecutionResult<Value, PipelineError> {
        ExecutionResult::unlogged(self.run(ctx).await)
    }
}
