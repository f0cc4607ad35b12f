//! ResetBoard command

use crate::context::PipelineContext;
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Forget all leads and columns; the next read starts from the defaults
#[operation(verb = "reset", noun = "board", description = "Clear all leads and columns")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ResetBoard;

impl ResetBoard {
    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::RESET).await;
        let _lock = ctx.lock().await?;
        ctx.clear().await?;
        tracing::info!("board reset");
        Ok(json!({ "reset": true }))
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for ResetBoard {
    async fn execute(&self, ctx: &PipelineContext) -> ExecutionResult<Value, PipelineError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        ExecutionResult::logged(
            self.op_string(),
            Value::Null,
            result,
            start.elapsed().as_millis() as u64,
        )
    }
}
