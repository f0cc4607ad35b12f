//! GetBoard command

use super::summarize;
use crate::context::PipelineContext;
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Get the columns together with per-column lead counts and values
#[operation(
    verb = "get",
    noun = "board",
    description = "Retrieve the columns with lead counts and totals"
)]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GetBoard;

impl GetBoard {
    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::FETCH_LEADS).await;
        let columns = ctx.read_columns().await?;
        let leads = ctx.read_leads().await?;

        Ok(json!({
            "columns": columns,
            "summaries": summarize(&columns, &leads),
            "lead_count": leads.len(),
        }))
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for GetBoard {
    async fn execute(&self, ctx: &PipelineContext) -> ExecutionResult<Value, PipelineError> {
        ExecutionResult::unlogged(self.run(ctx).await)
    }
}
